//! Timeout enforcement.

use std::future::Future;
use std::time::Duration;

use crate::api::{ApiError, ApiResult};

/// Run `fut` with a deadline; elapsing maps to [`ApiError::Timeout`].
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_deadline_elapses() {
        let result: ApiResult<()> = with_deadline(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert_eq!(result, Err(ApiError::Timeout));
    }

    #[tokio::test]
    async fn test_inner_result_passes_through() {
        let result = with_deadline(Duration::from_secs(1), async { Ok(7) }).await;
        assert_eq!(result, Ok(7));

        let result: ApiResult<()> = with_deadline(Duration::from_secs(1), async {
            Err(ApiError::Server { status: 502 })
        })
        .await;
        assert_eq!(result, Err(ApiError::Server { status: 502 }));
    }
}
