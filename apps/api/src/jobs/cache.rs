use redis::Client as RedisClient;
use tracing::{debug, warn};

use crate::jobs::schema::JobPosting;

const KEY_PREFIX: &str = "job_posting:v1:";

/// Redis cache of parsed postings, keyed by URL. Best-effort: every failure
/// is logged and treated as a miss.
#[derive(Clone)]
pub struct JobCache {
    redis: RedisClient,
    ttl_secs: u64,
}

impl JobCache {
    pub fn new(redis: RedisClient, ttl_secs: u64) -> Self {
        Self { redis, ttl_secs }
    }

    pub async fn get(&self, url: &str) -> Option<JobPosting> {
        if self.ttl_secs == 0 {
            return None;
        }
        let mut conn = match self.redis.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Job cache unavailable: {e}");
                return None;
            }
        };
        let cached = match redis::cmd("GET")
            .arg(cache_key(url))
            .query_async::<_, Option<String>>(&mut conn)
            .await
        {
            Ok(v) => v,
            Err(e) => {
                warn!("Job cache read failed: {e}");
                return None;
            }
        };
        let job = serde_json::from_str::<JobPosting>(&cached?)
            .map_err(|e| warn!("Discarding unreadable cached posting: {e}"))
            .ok()?;
        debug!("Job cache hit for {url}");
        Some(job)
    }

    pub async fn put(&self, url: &str, job: &JobPosting) {
        if self.ttl_secs == 0 {
            return;
        }
        let payload = match serde_json::to_string(job) {
            Ok(p) => p,
            Err(e) => {
                warn!("Could not serialize posting for cache: {e}");
                return;
            }
        };
        let result = async {
            let mut conn = self.redis.get_multiplexed_async_connection().await?;
            redis::cmd("SET")
                .arg(cache_key(url))
                .arg(payload)
                .arg("EX")
                .arg(self.ttl_secs)
                .query_async::<_, ()>(&mut conn)
                .await?;
            Ok::<(), redis::RedisError>(())
        }
        .await;
        if let Err(e) = result {
            warn!("Job cache write failed: {e}");
        }
    }
}

fn cache_key(url: &str) -> String {
    format!("{KEY_PREFIX}{}", url.trim())
}
