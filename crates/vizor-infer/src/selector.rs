use crate::catalog::{ModelCatalog, ModelSpec};
use crate::preprocess::preprocess;
use crate::{Backend, InferError, Session};
use std::time::Instant;
use vizor_base::Tensor;
use vizor_image::Frame;

/// Everything owned by one model selection: the session and the input and
/// output buffers sized for it. Dropped as a unit on re-selection.
pub struct ActiveModel {
    index: usize,
    spec: ModelSpec,
    session: Option<Box<dyn Session>>,
    input: Tensor<f32>,
    output: Tensor<f32>,
}

impl std::fmt::Debug for ActiveModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveModel")
            .field("index", &self.index)
            .field("name", &self.spec.name)
            .field("session", &self.session.is_some())
            .field("input", &self.input.shape)
            .field("output", &self.output.shape)
            .finish()
    }
}

impl ActiveModel {
    /// Load catalog entry `index`.
    ///
    /// # Errors
    ///
    /// `ModelNotFound` if the model file is missing, or whatever the backend
    /// reports while building the session.
    pub fn load(
        catalog: &ModelCatalog,
        index: usize,
        backend: &dyn Backend,
    ) -> Result<Self, InferError> {
        let spec = catalog
            .get(index)
            .ok_or_else(|| InferError::UnknownModel(format!("#{}", index)))?
            .clone();

        let session = if spec.is_passthrough() {
            None
        } else {
            let path = catalog.model_path(&spec);
            if !path.is_file() {
                return Err(InferError::ModelNotFound(path));
            }
            let started = Instant::now();
            let session = backend.load_model(&path)?;
            log::info!(
                "Loaded {} from {} via {} in {} ms",
                spec.name,
                path.display(),
                backend.name(),
                started.elapsed().as_millis()
            );
            log::debug!(
                "{}: inputs {:?}, outputs {:?}",
                spec.name,
                session.input_names(),
                session.output_names()
            );
            Some(session)
        };

        let input = Tensor::zeros(spec.input_shape())?;
        let output = Tensor::zeros(spec.output_shape())?;

        Ok(Self {
            index,
            spec,
            session,
            input,
            output,
        })
    }

    /// Preprocess `frame` into the input buffer and run the session.
    ///
    /// Does nothing for a pass-through selection.
    pub fn infer(&mut self, frame: &Frame) -> Result<(), InferError> {
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        preprocess(frame, &self.spec.input, &mut self.input.data)?;

        let started = Instant::now();
        session.run(&self.input, &mut self.output)?;
        log::debug!(
            "{} inference took {} ms",
            self.spec.name,
            started.elapsed().as_millis()
        );
        Ok(())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn input(&self) -> &Tensor<f32> {
        &self.input
    }

    pub fn output(&self) -> &Tensor<f32> {
        &self.output
    }

    pub fn session(&self) -> Option<&dyn Session> {
        self.session.as_deref()
    }
}

/// Keeps one catalog entry loaded and swaps it on request.
///
/// Selection is synchronous: `select` returns once the new session and
/// buffers exist. On failure the previous model stays active.
pub struct ModelSelector {
    catalog: ModelCatalog,
    backend: Box<dyn Backend>,
    active: ActiveModel,
}

impl std::fmt::Debug for ModelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSelector")
            .field("backend", &self.backend.name())
            .field("models", &self.catalog.len())
            .field("active", &self.active)
            .finish()
    }
}

impl ModelSelector {
    /// Load the catalog entry at `initial`.
    pub fn new(
        catalog: ModelCatalog,
        backend: Box<dyn Backend>,
        initial: usize,
    ) -> Result<Self, InferError> {
        catalog.validate()?;
        let active = ActiveModel::load(&catalog, initial, backend.as_ref())?;
        log::info!("Selected model: {}", active.spec.name);
        Ok(Self {
            catalog,
            backend,
            active,
        })
    }

    pub fn select(&mut self, index: usize) -> Result<(), InferError> {
        if index == self.active.index {
            return Ok(());
        }
        let next = ActiveModel::load(&self.catalog, index, self.backend.as_ref())?;
        log::info!(
            "Switched model: {} -> {}",
            self.active.spec.name,
            next.spec.name
        );
        // the old session and buffers drop here
        self.active = next;
        Ok(())
    }

    pub fn select_by_name(&mut self, name: &str) -> Result<(), InferError> {
        let index = self
            .catalog
            .find(name)
            .ok_or_else(|| InferError::UnknownModel(name.to_string()))?;
        self.select(index)
    }

    /// Select the following entry, wrapping around.
    pub fn select_next(&mut self) -> Result<(), InferError> {
        self.select((self.active.index + 1) % self.catalog.len())
    }

    /// Select the preceding entry, wrapping around.
    pub fn select_previous(&mut self) -> Result<(), InferError> {
        let len = self.catalog.len();
        self.select((self.active.index + len - 1) % len)
    }

    pub fn selected(&self) -> usize {
        self.active.index
    }

    pub fn active(&self) -> &ActiveModel {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut ActiveModel {
        &mut self.active
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }
}
