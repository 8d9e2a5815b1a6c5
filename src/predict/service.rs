use std::pin::Pin;
use std::sync::Arc;

use futures::task::{Context, Poll};
use futures::Future;
use tower::Service;

use crate::error::PredictError;
use crate::predict::{Predictor, Verdict};
use crate::session::SelectedImage;

/// `tower::Service` front for a [`Predictor`], so callers drive analyses
/// through the usual `ready().call()` shape and the remote side stays
/// swappable.
#[derive(Clone)]
pub struct PredictService {
    inner: Arc<dyn Predictor>,
}

impl PredictService {
    pub fn new(inner: Arc<dyn Predictor>) -> Self {
        Self { inner }
    }
}

impl Service<SelectedImage> for PredictService {
    type Response = Verdict;
    type Error = PredictError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, image: SelectedImage) -> Self::Future {
        let inner = self.inner.clone();
        Box::pin(async move { inner.predict(&image).await })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use tower::ServiceExt;

    use crate::error::SessionError;
    use crate::predict::Health;
    use crate::session::{AnalysisSession, Applied, Phase};

    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn png(name: &str) -> SelectedImage {
        SelectedImage::from_bytes(name, Arc::from(PNG_MAGIC.to_vec())).unwrap()
    }

    struct StubPredictor {
        outcome: fn() -> Result<Verdict, PredictError>,
    }

    #[async_trait]
    impl Predictor for StubPredictor {
        async fn predict(&self, _image: &SelectedImage) -> Result<Verdict, PredictError> {
            (self.outcome)()
        }

        async fn health(&self) -> Result<Health, PredictError> {
            Ok(Health {
                status: "healthy".to_string(),
                model_loaded: true,
            })
        }
    }

    #[tokio::test]
    async fn test_service_returns_the_predictor_verdict() {
        let mut service = PredictService::new(Arc::new(StubPredictor {
            outcome: || Ok(Verdict::new(true, 91, Some("malignant".to_string()))),
        }));

        let verdict = service
            .ready()
            .await
            .unwrap()
            .call(png("photo.png"))
            .await
            .unwrap();
        assert!(verdict.detected);
        assert_eq!(verdict.confidence, 91);
    }

    #[tokio::test]
    async fn test_service_propagates_predictor_failures() {
        let mut service = PredictService::new(Arc::new(StubPredictor {
            outcome: || {
                Err(PredictError::Rejected {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "model unavailable".to_string(),
                })
            },
        }));

        let err = service
            .ready()
            .await
            .unwrap()
            .call(png("photo.jpg"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "model unavailable");
    }

    // The full lifecycle the app runs: mint a request, run it through the
    // service, feed the outcome back into the session.
    #[tokio::test]
    async fn test_session_driven_through_service_completes() {
        let mut service = PredictService::new(Arc::new(StubPredictor {
            outcome: || Ok(Verdict::new(true, 91, Some("malignant".to_string()))),
        }));
        let mut session = AnalysisSession::new();
        session.select_image(png("photo.png"));

        let request = session.begin_analysis().unwrap();
        assert_eq!(session.phase(), Phase::Analyzing);
        assert_eq!(
            session.begin_analysis().unwrap_err(),
            SessionError::AnalysisInFlight
        );

        let outcome = service
            .ready()
            .await
            .unwrap()
            .call(request.image.clone())
            .await;
        assert_eq!(session.apply_outcome(request.token, outcome), Applied::Completed);
        assert_eq!(session.phase(), Phase::Completed);
        assert_eq!(session.result().unwrap().confidence, 91);
    }
}
