//! Typed async client for the PowerDNS HTTP API plus in-memory queries over
//! fetched zone data.
//!
//! ```no_run
//! use pdns_client::{ClientConfig, PowerDnsClient, RecordQuery, RecordType};
//!
//! # async fn run() -> pdns_client::Result<()> {
//! let client = PowerDnsClient::new(&ClientConfig::new("127.0.0.1:8081", "secret"))?;
//! let zone = client.get_zone("localhost", "example.com.").await?;
//! let soa = zone.soa()?;
//! let a_records = zone.query(&RecordQuery::new().rrtype(RecordType::A));
//! # let _ = (soa, a_records);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod powerdns;
pub mod validation;

pub use config::ClientConfig;
pub use error::{PdnsError, Result};
pub use powerdns::client::PowerDnsClient;
pub use powerdns::query::{MatchMode, RecordQuery};
pub use powerdns::types::{
    ApiError, BasicZoneInfo, Changetype, Comment, Config, RRSet, Record, RecordType, Server, Zone,
    ZoneCreate, ZoneKind,
};
