//! Environment-provided configuration for the destination collection.

use anyhow::Context;

/// Connection parameters for the destination MongoDB collection.
///
/// Every parameter is required and comes from the Lambda environment.
/// A missing variable fails the connection attempt instead of silently
/// proceeding with a default.
#[derive(Debug, Clone)]
pub struct SinkOpts {
    /// Destination host, e.g. `db.example.com:27017`
    pub host: String,
    /// Destination database name
    pub database: String,
    /// Destination collection name
    pub collection: String,
    /// Destination username
    pub username: String,
    /// Destination password
    pub password: String,
}

impl SinkOpts {
    /// Read connection parameters from the ambient environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: require("MONGODB_HOST")?,
            database: require("MONGODB_DATABASE")?,
            collection: require("MONGODB_COLLECTION")?,
            username: require("MONGODB_USERNAME")?,
            password: require("MONGODB_PASSWORD")?,
        })
    }
}

fn require(name: &str) -> anyhow::Result<String> {
    std::env::var(name).with_context(|| format!("{name} must be set"))
}
