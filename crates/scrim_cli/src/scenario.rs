//! Scenario files for `scrim simulate`

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

use scrim_fade::FadeConfig;
use scrim_wheel::WheelMode;

/// Semantic problems in an otherwise well-formed scenario
#[derive(Error, Debug, PartialEq)]
pub enum ScenarioError {
    #[error("container `{0}` is declared more than once")]
    DuplicateContainer(String),

    #[error("step {step} refers to unknown container `{name}`")]
    UnknownContainer { step: usize, name: String },

    #[error("viewport height must be positive, got {0}")]
    InvalidViewport(f32),
}

/// A simulated page and the interactions to replay on it
#[derive(Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub viewport: ViewportSpec,
    #[serde(default)]
    pub environment: EnvironmentSpec,
    #[serde(default)]
    pub containers: Vec<ContainerSpec>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Read, parse and validate a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scenario {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = toml::from_str(content).context("Failed to parse scenario")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> std::result::Result<(), ScenarioError> {
        if self.viewport.height <= 0.0 {
            return Err(ScenarioError::InvalidViewport(self.viewport.height));
        }

        let mut names = HashSet::new();
        for container in &self.containers {
            if !names.insert(container.name.as_str()) {
                return Err(ScenarioError::DuplicateContainer(container.name.clone()));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            if let Some(name) = step.container() {
                if !names.contains(name) {
                    return Err(ScenarioError::UnknownContainer {
                        step: index + 1,
                        name: name.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Browser window
#[derive(Debug, Deserialize)]
pub struct ViewportSpec {
    #[serde(default = "default_viewport_height")]
    pub height: f32,
    #[serde(default = "default_document_height")]
    pub document_height: f32,
    #[serde(default)]
    pub scroll_y: f32,
}

impl Default for ViewportSpec {
    fn default() -> Self {
        Self {
            height: default_viewport_height(),
            document_height: default_document_height(),
            scroll_y: 0.0,
        }
    }
}

fn default_viewport_height() -> f32 {
    800.0
}

fn default_document_height() -> f32 {
    3000.0
}

/// Host feature detection and user preferences
#[derive(Debug, Deserialize)]
pub struct EnvironmentSpec {
    #[serde(default = "default_true")]
    pub match_media: bool,
    #[serde(default = "default_true")]
    pub css_supports: bool,
    #[serde(default)]
    pub reduced_motion: bool,
    #[serde(default)]
    pub high_contrast: bool,
    #[serde(default = "default_true")]
    pub mask_image: bool,
    #[serde(default = "default_true")]
    pub transitions: bool,
}

impl Default for EnvironmentSpec {
    fn default() -> Self {
        Self {
            match_media: true,
            css_supports: true,
            reduced_motion: false,
            high_contrast: false,
            mask_image: true,
            transitions: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// How a container takes the wheel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModeSpec {
    #[default]
    Natural,
    HorizontalOnly,
}

impl From<ModeSpec> for WheelMode {
    fn from(mode: ModeSpec) -> Self {
        match mode {
            ModeSpec::Natural => WheelMode::Natural,
            ModeSpec::HorizontalOnly => WheelMode::HorizontalOnly,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RectSpec {
    #[serde(default)]
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SizeSpec {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct OffsetSpec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
}

/// One scroll container on the page
#[derive(Debug, Deserialize)]
pub struct ContainerSpec {
    pub name: String,
    /// Position in viewport coordinates when the page is at `viewport.scroll_y`
    pub rect: RectSpec,
    /// Scrollable content size; defaults to the rect size
    #[serde(default)]
    pub content: Option<SizeSpec>,
    #[serde(default)]
    pub offset: OffsetSpec,
    #[serde(default)]
    pub mode: ModeSpec,
    #[serde(default = "default_true")]
    pub hijack: bool,
    #[serde(default)]
    pub fade: FadeConfig,
}

/// One interaction to replay
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Wheel gesture; unclaimed motion scrolls the page
    Wheel {
        #[serde(default)]
        delta_x: f32,
        #[serde(default)]
        delta_y: f32,
    },
    /// Scroll a container to an absolute offset
    Scroll {
        container: String,
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    },
    /// Resize a container's visible area
    Resize {
        container: String,
        width: f32,
        height: f32,
    },
    /// Replace a container's content size
    Content {
        container: String,
        width: f32,
        height: f32,
    },
    /// Scroll the page to an absolute position
    PageScroll { y: f32 },
    /// Run one animation frame
    Frame,
    /// Change the reduced-motion preference
    SetReducedMotion { value: bool },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Wheel { .. } => "wheel",
            Step::Scroll { .. } => "scroll",
            Step::Resize { .. } => "resize",
            Step::Content { .. } => "content",
            Step::PageScroll { .. } => "page_scroll",
            Step::Frame => "frame",
            Step::SetReducedMotion { .. } => "set_reduced_motion",
        }
    }

    /// The container this step targets, if any
    pub fn container(&self) -> Option<&str> {
        match self {
            Step::Scroll { container, .. }
            | Step::Resize { container, .. }
            | Step::Content { container, .. } => Some(container),
            _ => None,
        }
    }
}
