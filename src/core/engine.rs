use crate::core::source::KmlSource;
use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct JoinEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> JoinEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self, sources: &[&KmlSource]) -> Result<String> {
        tracing::info!("Joining {} files", sources.len());

        let entries = self.pipeline.extract(sources)?;
        tracing::info!("Collected {} waypoints", entries.len());

        let result = self.pipeline.transform(entries)?;
        tracing::debug!("Rendered document of {} bytes", result.document.len());

        let output_path = self.pipeline.load(result)?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
