use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use strum_macros::Display;
use strum_macros::EnumIter;

use crate::error::UnknownValueError;
use crate::error::parse_enum;

/// Technology of a technical asset. Rules depend on the membership of the
/// predicate sets below by name, so adding a variant forces a review of
/// every predicate via the exhaustive matches.
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
pub enum Technology {
    #[default]
    UnknownTechnology,
    ClientSystem,
    Browser,
    Desktop,
    MobileApp,
    DevopsClient,
    WebServer,
    WebApplication,
    ApplicationServer,
    Database,
    FileServer,
    LocalFileSystem,
    Erp,
    Cms,
    WebServiceRest,
    WebServiceSoap,
    Ejb,
    SearchIndex,
    SearchEngine,
    ServiceRegistry,
    ReverseProxy,
    LoadBalancer,
    BuildPipeline,
    SourcecodeRepository,
    ArtifactRegistry,
    CodeInspectionPlatform,
    Monitoring,
    LdapServer,
    ContainerPlatform,
    BatchProcessing,
    EventListener,
    IdentityProvider,
    IdentityStoreLdap,
    IdentityStoreDatabase,
    Tool,
    Cli,
    Task,
    Function,
    Gateway,
    IotDevice,
    MessageQueue,
    StreamProcessing,
    ServiceMesh,
    DataLake,
    BigDataPlatform,
    ReportEngine,
    Ai,
    MailServer,
    Vault,
    Hsm,
    Waf,
    Ids,
    Ips,
    Scheduler,
    Mainframe,
    BlockStorage,
    Library,
}

impl Technology {
    pub fn explain(&self) -> &'static str {
        match self {
            Technology::UnknownTechnology => "Unknown technology",
            Technology::ClientSystem => "A client system",
            Technology::Browser => "A web browser",
            Technology::Desktop => "A desktop system (or laptop)",
            Technology::MobileApp => "A mobile app (smartphone, tablet)",
            Technology::DevopsClient => "A client used for development and/or administration",
            Technology::WebServer => "A web server",
            Technology::WebApplication => "A web application",
            Technology::ApplicationServer => "An application server (Java EE, etc.)",
            Technology::Database => "A database",
            Technology::FileServer => "A file server",
            Technology::LocalFileSystem => "The local file system",
            Technology::Erp => "Enterprise resource planning software",
            Technology::Cms => "Content management system",
            Technology::WebServiceRest => "A REST web service (API)",
            Technology::WebServiceSoap => "A SOAP web service (API)",
            Technology::Ejb => "Jakarta Enterprise Beans",
            Technology::SearchIndex => "The index database of a search engine",
            Technology::SearchEngine => "A search engine",
            Technology::ServiceRegistry => "A central place where services are registered",
            Technology::ReverseProxy => "A proxy hiding internal infrastructure from callers",
            Technology::LoadBalancer => "A load balancer directing incoming requests",
            Technology::BuildPipeline => "A software build pipeline",
            Technology::SourcecodeRepository => "A repository storing source code",
            Technology::ArtifactRegistry => "A registry holding build artifacts",
            Technology::CodeInspectionPlatform => "Static code analysis platform",
            Technology::Monitoring => "A monitoring system",
            Technology::LdapServer => "An LDAP server",
            Technology::ContainerPlatform => "A platform hosting and executing containers",
            Technology::BatchProcessing => "A batch processing system",
            Technology::EventListener => "A system waiting for events to act upon",
            Technology::IdentityProvider => "A authentication and authorization provider",
            Technology::IdentityStoreLdap => "Identity data held in an LDAP system",
            Technology::IdentityStoreDatabase => "Identity data held in a database",
            Technology::Tool => "A tool used during development or operations",
            Technology::Cli => "A command line interface tool",
            Technology::Task => "A scheduled task",
            Technology::Function => "A cloud function (FaaS)",
            Technology::Gateway => "A gateway connecting systems or trust boundaries",
            Technology::IotDevice => "An IoT device",
            Technology::MessageQueue => "A message queue",
            Technology::StreamProcessing => "Stream-based processing of messages",
            Technology::ServiceMesh => "Infrastructure layer for service-to-service traffic",
            Technology::DataLake => "A data lake",
            Technology::BigDataPlatform => "Storage and processing of big data",
            Technology::ReportEngine => "Software generating reports",
            Technology::Ai => "An artificial intelligence service",
            Technology::MailServer => "A mail server",
            Technology::Vault => "Software storing secrets and credentials",
            Technology::Hsm => "Hardware security module",
            Technology::Waf => "Web application firewall",
            Technology::Ids => "Intrusion detection system",
            Technology::Ips => "Intrusion prevention system",
            Technology::Scheduler => "A scheduler executing jobs",
            Technology::Mainframe => "A central mainframe system",
            Technology::BlockStorage => "Storage of data blocks",
            Technology::Library => "A library embedded into its caller",
        }
    }

    pub fn is_web_application(&self) -> bool {
        matches!(
            self,
            Technology::WebServer
                | Technology::WebApplication
                | Technology::ApplicationServer
                | Technology::Erp
                | Technology::Cms
                | Technology::IdentityProvider
                | Technology::ReportEngine
        )
    }

    pub fn is_web_service(&self) -> bool {
        matches!(self, Technology::WebServiceRest | Technology::WebServiceSoap)
    }

    pub fn is_identity_related(&self) -> bool {
        matches!(
            self,
            Technology::IdentityProvider
                | Technology::IdentityStoreLdap
                | Technology::IdentityStoreDatabase
        )
    }

    pub fn is_security_control_related(&self) -> bool {
        matches!(
            self,
            Technology::Vault
                | Technology::Hsm
                | Technology::Waf
                | Technology::Ids
                | Technology::Ips
        )
    }

    /// Monitoring-style sinks receive plaintext copies of traffic on
    /// purpose.
    pub fn is_unprotected_communications_tolerated(&self) -> bool {
        matches!(
            self,
            Technology::Monitoring | Technology::Ids | Technology::Ips
        )
    }

    pub fn is_unnecessary_data_tolerated(&self) -> bool {
        matches!(
            self,
            Technology::Monitoring | Technology::Ids | Technology::Ips
        )
    }

    pub fn is_close_to_high_value_targets_tolerated(&self) -> bool {
        matches!(
            self,
            Technology::Monitoring
                | Technology::Ids
                | Technology::Ips
                | Technology::LoadBalancer
                | Technology::ReverseProxy
        )
    }

    pub fn is_client(&self) -> bool {
        matches!(
            self,
            Technology::ClientSystem
                | Technology::Browser
                | Technology::Desktop
                | Technology::MobileApp
                | Technology::DevopsClient
                | Technology::IotDevice
        )
    }

    pub fn is_usually_able_to_propagate_identity_to_outgoing_targets(&self) -> bool {
        matches!(
            self,
            Technology::ClientSystem
                | Technology::Browser
                | Technology::Desktop
                | Technology::MobileApp
                | Technology::DevopsClient
                | Technology::WebServer
                | Technology::WebApplication
                | Technology::ApplicationServer
                | Technology::Erp
                | Technology::Cms
                | Technology::WebServiceRest
                | Technology::WebServiceSoap
                | Technology::Ejb
                | Technology::SearchEngine
                | Technology::ServiceRegistry
                | Technology::ReverseProxy
                | Technology::LoadBalancer
                | Technology::IdentityProvider
                | Technology::Tool
                | Technology::Cli
                | Technology::Task
                | Technology::Function
                | Technology::Gateway
                | Technology::IotDevice
                | Technology::MessageQueue
                | Technology::ServiceMesh
                | Technology::ReportEngine
        )
    }

    pub fn is_less_protected_type(&self) -> bool {
        matches!(
            self,
            Technology::ClientSystem
                | Technology::Browser
                | Technology::Desktop
                | Technology::MobileApp
                | Technology::DevopsClient
                | Technology::WebServer
                | Technology::WebApplication
                | Technology::ApplicationServer
                | Technology::Cms
                | Technology::WebServiceRest
                | Technology::WebServiceSoap
                | Technology::Ejb
                | Technology::BuildPipeline
                | Technology::SourcecodeRepository
                | Technology::ArtifactRegistry
                | Technology::CodeInspectionPlatform
                | Technology::Monitoring
                | Technology::IotDevice
                | Technology::Ai
                | Technology::MailServer
                | Technology::Scheduler
                | Technology::Mainframe
        )
    }

    pub fn is_usually_processing_end_user_requests(&self) -> bool {
        matches!(
            self,
            Technology::WebServer
                | Technology::WebApplication
                | Technology::ApplicationServer
                | Technology::Erp
                | Technology::WebServiceRest
                | Technology::WebServiceSoap
                | Technology::Ejb
                | Technology::ReportEngine
        )
    }

    pub fn is_usually_storing_end_user_data(&self) -> bool {
        matches!(
            self,
            Technology::Database
                | Technology::Erp
                | Technology::FileServer
                | Technology::LocalFileSystem
                | Technology::BlockStorage
                | Technology::MailServer
        )
    }

    pub fn is_exclusively_frontend_related(&self) -> bool {
        matches!(
            self,
            Technology::ClientSystem
                | Technology::Browser
                | Technology::Desktop
                | Technology::MobileApp
                | Technology::DevopsClient
                | Technology::Cms
                | Technology::ReverseProxy
                | Technology::Waf
                | Technology::IotDevice
        )
    }

    pub fn is_exclusively_backend_related(&self) -> bool {
        matches!(
            self,
            Technology::Database
                | Technology::IdentityProvider
                | Technology::IdentityStoreLdap
                | Technology::IdentityStoreDatabase
                | Technology::Erp
                | Technology::WebServiceRest
                | Technology::WebServiceSoap
                | Technology::Ejb
                | Technology::SearchIndex
                | Technology::SearchEngine
                | Technology::ContainerPlatform
                | Technology::BatchProcessing
                | Technology::EventListener
                | Technology::DataLake
                | Technology::BigDataPlatform
                | Technology::MessageQueue
                | Technology::StreamProcessing
                | Technology::ServiceMesh
                | Technology::Vault
                | Technology::Hsm
                | Technology::Scheduler
                | Technology::Mainframe
                | Technology::FileServer
                | Technology::BlockStorage
        )
    }

    pub fn is_development_relevant(&self) -> bool {
        matches!(
            self,
            Technology::BuildPipeline
                | Technology::SourcecodeRepository
                | Technology::ArtifactRegistry
                | Technology::CodeInspectionPlatform
                | Technology::DevopsClient
        )
    }

    pub fn is_traffic_forwarding(&self) -> bool {
        matches!(
            self,
            Technology::LoadBalancer | Technology::ReverseProxy | Technology::Waf
        )
    }

    pub fn is_embedded_component(&self) -> bool {
        matches!(self, Technology::Library)
    }
}

impl FromStr for Technology {
    type Err = UnknownValueError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        parse_enum("technology", value)
    }
}
