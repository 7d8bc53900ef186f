//! Publish/subscribe queue client used by the queue sink

use redis::Commands;
use tracing::{debug, info};

use crate::error::Result;

/// Publishes messages to a named channel
pub trait QueuePublisher {
    fn publish(&mut self, channel: &str, message: &str) -> Result<()>;
}

/// Opens a connection to a queue broker
pub trait QueueConnector {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn QueuePublisher>>;
}

/// Connects to redis and publishes with `PUBLISH`
#[derive(Debug, Default, Clone, Copy)]
pub struct RedisConnector;

impl QueueConnector for RedisConnector {
    fn connect(&self, endpoint: &str) -> Result<Box<dyn QueuePublisher>> {
        Ok(Box::new(RedisPublisher::connect(endpoint)?))
    }
}

pub struct RedisPublisher {
    connection: redis::Connection,
}

impl RedisPublisher {
    /// Blocking connect with no retry
    pub fn connect(endpoint: &str) -> Result<Self> {
        let url = redis_url(endpoint);
        info!("Connecting to redis at {}", url);
        let client = redis::Client::open(url.as_str())?;
        let connection = client.get_connection()?;
        Ok(Self { connection })
    }
}

impl QueuePublisher for RedisPublisher {
    fn publish(&mut self, channel: &str, message: &str) -> Result<()> {
        let receivers: i64 = self.connection.publish(channel, message)?;
        debug!("Published {} bytes to {} ({} receivers)", message.len(), channel, receivers);
        Ok(())
    }
}

/// Accept `host`, `host:port` or a full connection URL
pub fn redis_url(endpoint: &str) -> String {
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("redis://{endpoint}")
    }
}
