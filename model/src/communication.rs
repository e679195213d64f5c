use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;

use crate::Confidentiality;
use crate::Criticality;
use crate::ParsedModel;
use crate::Usage;
use crate::error::UnknownValueError;
use crate::error::parse_enum;

/// Communication protocol of a data flow. Rules never enumerate protocol
/// subsets at call sites; they go through the capability predicates below.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Protocol {
    #[default]
    UnknownProtocol,
    Http,
    Https,
    Ws,
    Wss,
    ReverseProxyWebProtocol,
    ReverseProxyWebProtocolEncrypted,
    Mqtt,
    Jdbc,
    JdbcEncrypted,
    Odbc,
    OdbcEncrypted,
    SqlAccessProtocol,
    SqlAccessProtocolEncrypted,
    NosqlAccessProtocol,
    NosqlAccessProtocolEncrypted,
    Binary,
    BinaryEncrypted,
    Text,
    TextEncrypted,
    Ssh,
    SshTunnel,
    Smtp,
    SmtpEncrypted,
    Pop3,
    Pop3Encrypted,
    Imap,
    ImapEncrypted,
    Ftp,
    Ftps,
    Sftp,
    Scp,
    Ldap,
    Ldaps,
    Jms,
    Nfs,
    Smb,
    SmbEncrypted,
    LocalFileAccess,
    Nrpe,
    Xmpp,
    Iiop,
    IiopEncrypted,
    Jrmp,
    JrmpEncrypted,
    InProcessLibraryCall,
    ContainerSpawning,
}

impl Protocol {
    pub fn is_encrypted(&self) -> bool {
        matches!(
            self,
            Protocol::Https
                | Protocol::Wss
                | Protocol::ReverseProxyWebProtocolEncrypted
                | Protocol::JdbcEncrypted
                | Protocol::OdbcEncrypted
                | Protocol::SqlAccessProtocolEncrypted
                | Protocol::NosqlAccessProtocolEncrypted
                | Protocol::BinaryEncrypted
                | Protocol::TextEncrypted
                | Protocol::Ssh
                | Protocol::SshTunnel
                | Protocol::Ftps
                | Protocol::Sftp
                | Protocol::Scp
                | Protocol::Ldaps
                | Protocol::SmbEncrypted
                | Protocol::SmtpEncrypted
                | Protocol::Pop3Encrypted
                | Protocol::ImapEncrypted
                | Protocol::IiopEncrypted
                | Protocol::JrmpEncrypted
        )
    }

    /// Process-local communication never leaves the machine boundary and is
    /// exempt from transport-level findings.
    pub fn is_process_local(&self) -> bool {
        matches!(
            self,
            Protocol::InProcessLibraryCall
                | Protocol::LocalFileAccess
                | Protocol::ContainerSpawning
        )
    }

    /// With `lax` also counts protocols that databases are sometimes exposed
    /// over (web and generic text/binary channels), not only native drivers.
    pub fn is_potential_database_access_protocol(&self, lax: bool) -> bool {
        let strict = matches!(
            self,
            Protocol::Jdbc
                | Protocol::JdbcEncrypted
                | Protocol::Odbc
                | Protocol::OdbcEncrypted
                | Protocol::SqlAccessProtocol
                | Protocol::SqlAccessProtocolEncrypted
                | Protocol::NosqlAccessProtocol
                | Protocol::NosqlAccessProtocolEncrypted
        );
        if strict {
            return true;
        }
        lax && matches!(
            self,
            Protocol::Http
                | Protocol::Https
                | Protocol::Ws
                | Protocol::Wss
                | Protocol::ReverseProxyWebProtocol
                | Protocol::ReverseProxyWebProtocolEncrypted
                | Protocol::Text
                | Protocol::TextEncrypted
                | Protocol::Binary
                | Protocol::BinaryEncrypted
        )
    }

    pub fn is_potential_web_access_protocol(&self) -> bool {
        matches!(
            self,
            Protocol::Http
                | Protocol::Https
                | Protocol::Ws
                | Protocol::Wss
                | Protocol::ReverseProxyWebProtocol
                | Protocol::ReverseProxyWebProtocolEncrypted
        )
    }
}

impl FromStr for Protocol {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("protocol", value)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Authentication {
    #[default]
    None,
    Credentials,
    SessionId,
    Token,
    ClientCertificate,
    TwoFactor,
    Externalized,
}

impl Authentication {
    pub fn title(&self) -> &'static str {
        match self {
            Authentication::None => "None",
            Authentication::Credentials => "Credentials",
            Authentication::SessionId => "Session-ID",
            Authentication::Token => "Token",
            Authentication::ClientCertificate => "Client Certificate",
            Authentication::TwoFactor => "Two-Factor",
            Authentication::Externalized => "Externalized",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Authentication::None => "No authentication",
            Authentication::Credentials => "Username and password, hardcoded or similar",
            Authentication::SessionId => "Server-side session identifier",
            Authentication::Token => "Bearer or similar token",
            Authentication::ClientCertificate => "TLS client certificate",
            Authentication::TwoFactor => "Two-factor authentication",
            Authentication::Externalized => "Externalized to a surrounding component",
        }
    }
}

impl FromStr for Authentication {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("authentication", value)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Authorization {
    #[default]
    None,
    TechnicalUser,
    EndUserIdentityPropagation,
}

impl Authorization {
    pub fn title(&self) -> &'static str {
        match self {
            Authorization::None => "None",
            Authorization::TechnicalUser => "Technical User",
            Authorization::EndUserIdentityPropagation => "End-User Identity Propagation",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Authorization::None => "No authorization",
            Authorization::TechnicalUser => "Technical user (service-to-service)",
            Authorization::EndUserIdentityPropagation => {
                "Identity of the end user propagates to the target"
            }
        }
    }
}

impl FromStr for Authorization {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("authorization", value)
    }
}

/// A directed data flow between two technical assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunicationLink {
    pub id: String,
    pub source_id: String,
    pub target_id: String,
    pub title: String,
    pub description: String,
    pub protocol: Protocol,
    pub tags: Vec<String>,
    pub vpn: bool,
    pub ip_filtered: bool,
    pub readonly: bool,
    pub authentication: Authentication,
    pub authorization: Authorization,
    pub usage: Usage,
    pub data_assets_sent: Vec<String>,
    pub data_assets_received: Vec<String>,
}

impl CommunicationLink {
    /// Stable identifier derived from the endpoints and the title. The same
    /// model always produces the same link id, which in turn keeps synthetic
    /// risk ids stable across runs.
    pub fn synthesize_id(source_id: &str, target_id: &str, title: &str) -> String {
        let slug = title.trim().to_lowercase().replace(' ', "-");
        format!("{source_id}>{target_id}@{slug}")
    }

    pub fn is_tagged_with_any(&self, tags: &[String]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }

    /// Highest confidentiality over all data assets sent or received.
    pub fn highest_confidentiality(&self, model: &ParsedModel) -> Confidentiality {
        let mut highest = Confidentiality::Public;
        for data_id in self.data_assets_sent.iter().chain(&self.data_assets_received) {
            if let Some(data_asset) = model.data_assets.get(data_id) {
                highest = highest.max(data_asset.confidentiality);
            }
        }
        highest
    }

    pub fn highest_integrity(&self, model: &ParsedModel) -> Criticality {
        let mut highest = Criticality::Archive;
        for data_id in self.data_assets_sent.iter().chain(&self.data_assets_received) {
            if let Some(data_asset) = model.data_assets.get(data_id) {
                highest = highest.max(data_asset.integrity);
            }
        }
        highest
    }

    pub fn highest_availability(&self, model: &ParsedModel) -> Criticality {
        let mut highest = Criticality::Archive;
        for data_id in self.data_assets_sent.iter().chain(&self.data_assets_received) {
            if let Some(data_asset) = model.data_assets.get(data_id) {
                highest = highest.max(data_asset.availability);
            }
        }
        highest
    }

    /// True when source and target are not directly contained in the same
    /// trust boundary.
    pub fn is_across_trust_boundary(&self, model: &ParsedModel) -> bool {
        !model.is_same_trust_boundary(&self.source_id, &self.target_id)
    }

    /// Like [`Self::is_across_trust_boundary`], but execution-environment
    /// boundaries are transparent: only the nearest network boundary counts.
    pub fn is_across_trust_boundary_network_only(&self, model: &ParsedModel) -> bool {
        !model.is_same_trust_boundary_network_only(&self.source_id, &self.target_id)
    }
}
