use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::{CameraModel, CameraState, Orientation, Sensitivity};
use crate::damping::Damping;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("expected <viewer> root element, found <{0}>")]
    UnexpectedRoot(String),
    #[error("<{tag}> is not a valid number: {value:?}")]
    InvalidNumber { tag: String, value: String },
    #[error("<easing> must be in (0, 1], got {0}")]
    EasingOutOfRange(f32),
    #[error("<{0}> must be a finite number")]
    NotFinite(String),
    #[error("window size must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
}

/// Viewer configuration, read from an optional `<viewer>` XML document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub title: String,
    /// Initial window width in logical pixels.
    pub width: u32,
    /// Initial window height in logical pixels.
    pub height: u32,
    /// Image shown behind the volume; a gradient is used when absent.
    pub background: Option<PathBuf>,
    pub camera: CameraSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Orbit Raymarch".to_string(),
            width: 1280,
            height: 720,
            background: None,
            camera: CameraSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub initial: CameraState,
    pub sensitivity: Sensitivity,
    pub damping: Damping,
}

impl Settings {
    /// Reads and parses a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path)
            .with_context(|| format!("unable to read settings {}", path.display()))?;
        let mut settings = Self::from_xml(&xml)
            .with_context(|| format!("failed to parse settings {}", path.display()))?;
        // Relative background paths resolve against the settings file.
        if let (Some(background), Some(parent)) = (settings.background.as_mut(), path.parent()) {
            if background.is_relative() {
                *background = parent.join(&*background);
            }
        }
        Ok(settings)
    }

    /// Parses a `<viewer>` document. Missing elements keep their defaults.
    pub fn from_xml(xml: &str) -> Result<Self, SettingsError> {
        let document = Document::parse(xml)?;
        let root = document.root_element();
        if !root.has_tag_name("viewer") {
            return Err(SettingsError::UnexpectedRoot(
                root.tag_name().name().to_string(),
            ));
        }

        let mut settings = Self::default();
        if let Some(title) = optional_text(&root, "title") {
            settings.title = title;
        }
        settings.width = parse_number(&root, "width", settings.width)?;
        settings.height = parse_number(&root, "height", settings.height)?;
        if settings.width == 0 || settings.height == 0 {
            return Err(SettingsError::ZeroSize {
                width: settings.width,
                height: settings.height,
            });
        }
        settings.background = optional_text(&root, "background").map(PathBuf::from);

        if let Some(camera) = root.children().find(|child| child.has_tag_name("camera")) {
            settings.camera = parse_camera(&camera)?;
        }
        Ok(settings)
    }

    pub fn camera_model(&self) -> CameraModel {
        CameraModel::new(
            self.camera.initial,
            self.camera.sensitivity,
            self.camera.damping,
        )
    }
}

fn parse_camera(node: &Node<'_, '_>) -> Result<CameraSettings, SettingsError> {
    let defaults = CameraSettings::default();
    let pitch = parse_finite(node, "pitch", defaults.initial.orientation.pitch)?;
    let yaw = parse_finite(node, "yaw", defaults.initial.orientation.yaw)?;
    let zoom = parse_finite(node, "zoom", defaults.initial.zoom)?;

    let easing = parse_finite(node, "easing", defaults.damping.alpha())?;
    let damping = Damping::new(easing).ok_or(SettingsError::EasingOutOfRange(easing))?;

    let sensitivity = Sensitivity {
        rotate: parse_finite(node, "rotate-sensitivity", defaults.sensitivity.rotate)?,
        zoom: parse_finite(node, "zoom-sensitivity", defaults.sensitivity.zoom)?,
    };

    Ok(CameraSettings {
        initial: CameraState::clamped(Orientation::new(pitch, yaw), zoom),
        sensitivity,
        damping,
    })
}

fn optional_text(node: &Node<'_, '_>, tag: &str) -> Option<String> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

fn parse_number<T: std::str::FromStr>(
    node: &Node<'_, '_>,
    tag: &str,
    default: T,
) -> Result<T, SettingsError> {
    match optional_text(node, tag) {
        Some(value) => value
            .parse::<T>()
            .map_err(|_| SettingsError::InvalidNumber {
                tag: tag.to_string(),
                value,
            }),
        None => Ok(default),
    }
}

fn parse_finite(node: &Node<'_, '_>, tag: &str, default: f32) -> Result<f32, SettingsError> {
    let value = parse_number(node, tag, default)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SettingsError::NotFinite(tag.to_string()))
    }
}
