use crate::core::tree;
use crate::core::{Pipeline, Storage};
use crate::domain::model::{TreeDrawing, TreeParams};
use crate::utils::error::Result;
use crate::utils::prompt::Notices;
use crate::utils::validation::Validate;

pub struct TreePipeline<S: Storage> {
    storage: S,
    params: TreeParams,
    output_file: String,
    notices: Notices,
}

impl<S: Storage> TreePipeline<S> {
    pub fn new(storage: S, params: TreeParams, output_file: String) -> Self {
        Self {
            storage,
            params,
            output_file,
            notices: Notices::new(),
        }
    }

    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for TreePipeline<S> {
    type Input = TreeParams;
    type Output = TreeDrawing;

    async fn extract(&self) -> Result<TreeParams> {
        self.params.validate()?;
        Ok(self.params)
    }

    async fn transform(&self, params: TreeParams) -> Result<TreeDrawing> {
        let drawing = tree::render(&params);
        tracing::debug!(
            "Drew {} strokes at depth {}",
            drawing.segments.len(),
            params.depth
        );
        Ok(drawing)
    }

    async fn load(&self, drawing: TreeDrawing) -> Result<String> {
        let svg = tree::render_svg(&drawing.segments);
        self.storage
            .write_file(&self.output_file, svg.as_bytes())
            .await?;

        self.notices.push(format!(
            "Tree with {} branches drawn to '{}'.",
            drawing.segments.len(),
            self.output_file
        ));
        Ok(self.output_file.clone())
    }
}
