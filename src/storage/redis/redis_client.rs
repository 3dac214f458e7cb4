use redis::aio::MultiplexedConnection;
use redis::cluster_async::ClusterConnection;
use redis::{AsyncCommands, FromRedisValue, ToRedisArgs};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
enum RedisConn {
    Single(Arc<Mutex<MultiplexedConnection>>),
    Cluster(Arc<Mutex<ClusterConnection>>),
}

/// Thin wrapper that hides whether we talk to one Redis or a cluster.
#[derive(Clone)]
pub struct RedisClient {
    conn: RedisConn,
}

impl RedisClient {
    pub fn single(conn: MultiplexedConnection) -> Self {
        Self {
            conn: RedisConn::Single(Arc::new(Mutex::new(conn))),
        }
    }

    pub fn cluster(conn: ClusterConnection) -> Self {
        Self {
            conn: RedisConn::Cluster(Arc::new(Mutex::new(conn))),
        }
    }

    /// Connects to `urls`; more than one url means a cluster.
    pub async fn connect(urls: &[String]) -> anyhow::Result<Self> {
        match urls {
            [] => Err(anyhow::anyhow!("Redis urls not configured")),
            [url] => {
                log::debug!("Using single Redis instance at: {}", url);
                let client = redis::Client::open(url.as_str())?;
                let conn = client.get_multiplexed_async_connection().await?;
                Ok(Self::single(conn))
            }
            _ => {
                log::debug!("Using Redis Cluster with URLs: {:?}", urls);
                let client = redis::cluster::ClusterClient::new(urls.to_vec())?;
                let conn = client.get_async_connection().await?;
                Ok(Self::cluster(conn))
            }
        }
    }

    pub async fn set<T>(&self, key: &str, value: T) -> anyhow::Result<()>
    where
        T: ToRedisArgs + Send + Sync,
    {
        match &self.conn {
            RedisConn::Single(conn) => {
                let _: () = conn.lock().await.set(key, value).await?;
            }
            RedisConn::Cluster(conn) => {
                let _: () = conn.lock().await.set(key, value).await?;
            }
        }
        Ok(())
    }

    pub async fn get<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromRedisValue + Send,
    {
        let value: Option<T> = match &self.conn {
            RedisConn::Single(conn) => conn.lock().await.get(key).await?,
            RedisConn::Cluster(conn) => conn.lock().await.get(key).await?,
        };
        Ok(value)
    }

    pub async fn incr(&self, key: &str, increment: i64) -> anyhow::Result<i64> {
        let value: i64 = match &self.conn {
            RedisConn::Single(conn) => conn.lock().await.incr(key, increment).await?,
            RedisConn::Cluster(conn) => conn.lock().await.incr(key, increment).await?,
        };
        Ok(value)
    }

    pub async fn zadd(&self, key: &str, member: &str, score: i64) -> anyhow::Result<()> {
        match &self.conn {
            RedisConn::Single(conn) => {
                let _: () = conn.lock().await.zadd(key, member, score).await?;
            }
            RedisConn::Cluster(conn) => {
                let _: () = conn.lock().await.zadd(key, member, score).await?;
            }
        }
        Ok(())
    }

    /// Members of a sorted set in ascending score order.
    pub async fn zrange_all(&self, key: &str) -> anyhow::Result<Vec<String>> {
        let values: Vec<String> = match &self.conn {
            RedisConn::Single(conn) => conn.lock().await.zrange(key, 0, -1).await?,
            RedisConn::Cluster(conn) => conn.lock().await.zrange(key, 0, -1).await?,
        };
        Ok(values)
    }
}
