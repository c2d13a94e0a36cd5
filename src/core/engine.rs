use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ScriptEngine<P: Pipeline> {
    pipeline: P,
    name: String,
}

impl<P: Pipeline> ScriptEngine<P> {
    pub fn new(name: impl Into<String>, pipeline: P) -> Self {
        Self {
            pipeline,
            name: name.into(),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting {}", self.name);

        // Extract
        tracing::debug!("Reading input...");
        let input = self.pipeline.extract().await?;

        // Transform
        tracing::debug!("Transforming...");
        let output = self.pipeline.transform(input).await?;

        // Load
        tracing::debug!("Writing output...");
        let location = self.pipeline.load(output).await?;

        tracing::info!(
            "✅ {} finished in {:?}, output: {}",
            self.name,
            started.elapsed(),
            location
        );
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::KitError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingPipeline {
        steps: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        type Input = u32;
        type Output = u32;

        async fn extract(&self) -> Result<u32> {
            self.steps.lock().unwrap().push("extract");
            Ok(20)
        }

        async fn transform(&self, input: u32) -> Result<u32> {
            self.steps.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(KitError::ProcessingError {
                    message: "boom".to_string(),
                });
            }
            Ok(input + 1)
        }

        async fn load(&self, output: u32) -> Result<String> {
            self.steps.lock().unwrap().push("load");
            Ok(format!("value-{}", output))
        }
    }

    #[test]
    fn test_engine_runs_steps_in_order() {
        let engine = ScriptEngine::new(
            "recording",
            RecordingPipeline {
                steps: Mutex::new(Vec::new()),
                fail_transform: false,
            },
        );

        let location = tokio_test::block_on(engine.run()).unwrap();
        assert_eq!(location, "value-21");
        assert_eq!(
            *engine.pipeline().steps.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[tokio::test]
    async fn test_engine_stops_on_error() {
        let engine = ScriptEngine::new(
            "recording",
            RecordingPipeline {
                steps: Mutex::new(Vec::new()),
                fail_transform: true,
            },
        );

        assert!(engine.run().await.is_err());
        assert_eq!(
            *engine.pipeline().steps.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
