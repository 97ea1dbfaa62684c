use std::borrow::Cow;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Declares an open string enumeration: named constants for well-known
/// values, while any other string still decodes and re-encodes unchanged.
macro_rules! open_str_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$cmeta:meta])* $konst:ident = $value:literal,)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            $($(#[$cmeta])* pub const $konst: $name = $name(Cow::Borrowed($value));)*

            pub fn new(value: impl Into<String>) -> Self {
                $name(Cow::Owned(value.into()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                $name::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name::new(value)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

open_str_enum! {
    /// DNS record type of an RRSet ("A", "MX", ...).
    RecordType {
        MX = "MX",
        A = "A",
        AAAA = "AAAA",
        NS = "NS",
        SOA = "SOA",
        CNAME = "CNAME",
        TXT = "TXT",
        PTR = "PTR",
        SRV = "SRV",
    }
}

open_str_enum! {
    /// Mutation directive attached to an RRSet in a PATCH payload.
    Changetype {
        /// Create or overwrite the whole RRSet.
        REPLACE = "REPLACE",
        /// Remove the RRSet.
        DELETE = "DELETE",
    }
}

open_str_enum! {
    ZoneKind {
        NATIVE = "Native",
        MASTER = "Master",
        SLAVE = "Slave",
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}

/// `/servers` resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Server {
    pub id: String, // usually "localhost"
    #[serde(rename = "type")]
    pub server_type: String, // "Server"
    pub daemon_type: String, // "authoritative" / "recursor"
    pub version: String,
    pub url: String,
    pub config_url: String,
    pub zones_url: String,
}

/// Zone as it appears in the zone listing, without RRSets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicZoneInfo {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String, // "example.com."
    pub name: String, // "example.com."
    /// `None` when the server left the kind out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ZoneKind>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub account: String,
    #[serde(skip_serializing_if = "is_false")]
    pub dnssec: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub masters: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub serial: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub notified_serial: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_check: i64,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String, // "/api/v1/servers/localhost/zones/example.com."
}

/// Full zone as returned by the single-zone endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    #[serde(flatten)]
    pub info: BasicZoneInfo,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrsets: Vec<RRSet>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub soa_edit: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub soa_edit_api: String,
}

impl Zone {
    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn kind(&self) -> Option<&ZoneKind> {
        self.info.kind.as_ref()
    }

    pub fn serial(&self) -> u64 {
        self.info.serial
    }

    pub fn info(&self) -> &BasicZoneInfo {
        &self.info
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RRSet {
    pub name: String, // "www.example.com."
    #[serde(rename = "type")]
    pub rrtype: RecordType,
    #[serde(default)]
    pub ttl: u32,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changetype: Option<Changetype>,
}

impl RRSet {
    /// RRSet that creates or overwrites `name`/`rrtype` with `records`.
    pub fn replace(
        name: impl Into<String>,
        rrtype: RecordType,
        ttl: u32,
        records: Vec<Record>,
    ) -> Self {
        Self {
            name: name.into(),
            rrtype,
            ttl,
            records,
            comments: Vec::new(),
            changetype: Some(Changetype::REPLACE),
        }
    }

    /// RRSet that removes `name`/`rrtype` from the zone.
    pub fn delete(name: impl Into<String>, rrtype: RecordType) -> Self {
        Self {
            name: name.into(),
            rrtype,
            ttl: 0,
            records: Vec::new(),
            comments: Vec::new(),
            changetype: Some(Changetype::DELETE),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub content: String, // "192.0.2.1" or "ns1.example.net."
    #[serde(default)]
    pub disabled: bool,
}

impl Record {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            disabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
    #[serde(default)]
    pub account: String,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub modified_at: DateTime<Utc>,
}

/// Server configuration setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub name: String,
    #[serde(rename = "type")]
    pub config_type: String, // "ConfigSetting"
    pub value: String,
}

/// Error body PowerDNS sends with 4xx/5xx responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    #[serde(default)]
    pub errors: Vec<String>,
}

// Used when creating a zone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneCreate {
    pub name: String, // "sub.base.example.com."
    pub kind: ZoneKind,
    #[serde(default)]
    pub nameservers: Vec<String>, // ["ns1.example.net.", "ns2.example.net."]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rrsets: Vec<RRSet>,
}
