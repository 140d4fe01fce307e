//! Filter catalog: user-facing filter ids mapped to the transform they run.

use serde::Deserialize;

use crate::color::OverlayColor;
use crate::program::ProgramParams;

/// Id of the identity filter, always first in the catalog.
pub const IDENTITY_ID: &str = "normal";

/// What a filter does to a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformKind {
    /// Passthrough.
    None,
    /// 3D LUT loaded from an asset path.
    LutAsset(String),
    /// Procedural program with its default uniforms.
    ShaderProgram(ProgramParams),
    /// Flat multiplicative tint.
    ColorOverlay(OverlayColor),
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub id: String,
    pub display_name: String,
    pub description: String,
    /// Icon name understood by the host UI.
    pub icon: String,
    pub kind: TransformKind,
    /// Overlay shown while the real transform is unavailable.
    pub fallback: OverlayColor,
}

impl FilterSpec {
    fn builtin(
        id: &str,
        display_name: &str,
        description: &str,
        icon: &str,
        kind: TransformKind,
        fallback: OverlayColor,
    ) -> Self {
        Self {
            id: id.to_owned(),
            display_name: display_name.to_owned(),
            description: description.to_owned(),
            icon: icon.to_owned(),
            kind,
            fallback,
        }
    }

    /// The asset path, for LUT filters.
    pub fn lut_path(&self) -> Option<&str> {
        match &self.kind {
            TransformKind::LutAsset(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self.kind, TransformKind::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter id: {0}")]
pub struct UnknownFilter(pub String);

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate filter id: {0}")]
    DuplicateId(String),

    #[error("filter {id}: unrecognized preview color {value:?}")]
    PreviewColor { id: String, value: String },

    #[error("invalid filter catalog: {0}")]
    Json(#[from] serde_json::Error),
}

/// One entry of a JSON LUT catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogEntry {
    #[serde(default)]
    id: Option<String>,
    name: String,
    display_name: String,
    file_path: String,
    #[serde(default)]
    description: String,
    icon: String,
    #[serde(default)]
    preview_color: Option<String>,
}

/// Ordered, immutable filter catalog.
#[derive(Debug, Clone)]
pub struct FilterRegistry {
    filters: Vec<FilterSpec>,
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FilterRegistry {
    /// The bundled catalog.
    pub fn builtin() -> Self {
        use TransformKind::{LutAsset, ShaderProgram};
        let rgba = OverlayColor::rgba8;

        let mut filters = vec![
            FilterSpec::builtin(
                IDENTITY_ID,
                "Normal",
                "No filter applied",
                "image-outline",
                TransformKind::None,
                OverlayColor::TRANSPARENT,
            ),
            FilterSpec::builtin(
                "tokyo",
                "Tokyo",
                "Cinematic Tokyo style with blue shadows and amber highlights",
                "videocam-outline",
                LutAsset("luts/tokyodeception.png".into()),
                rgba(90, 110, 160, 0.25),
            ),
            FilterSpec::builtin(
                "chinatown",
                "Chinatown",
                "Vibrant urban look with enhanced warm tones and deep contrast",
                "aperture-outline",
                LutAsset("luts/chinatown.png".into()),
                rgba(230, 170, 110, 0.25),
            ),
            FilterSpec::builtin(
                "retro",
                "Retro",
                "Vintage film look with warm tones and subtle grain",
                "film-outline",
                ShaderProgram(ProgramParams::RETRO_CAM),
                rgba(220, 180, 140, 0.25),
            ),
            FilterSpec::builtin(
                "fuji",
                "Fuji",
                "Fujifilm-inspired colors with rich greens and vibrant reds",
                "leaf-outline",
                ShaderProgram(ProgramParams::FUJI),
                rgba(130, 180, 160, 0.3),
            ),
            FilterSpec::builtin(
                "glitch",
                "Glitch",
                "Digital distortion with RGB shifts and noise",
                "flash-outline",
                ShaderProgram(ProgramParams::GLITCH),
                rgba(100, 120, 220, 0.25),
            ),
            FilterSpec::builtin(
                "vhs",
                "VHS",
                "Old VHS tape look with scanlines and color bleeding",
                "tv-outline",
                ShaderProgram(ProgramParams::VHS),
                rgba(180, 100, 120, 0.25),
            ),
            FilterSpec::builtin(
                "duotone",
                "Duotone",
                "Two-tone color effect with customizable colors",
                "contrast-outline",
                ShaderProgram(ProgramParams::DUOTONE),
                rgba(120, 80, 180, 0.3),
            ),
        ];

        let film_looks = [
            ("gold-200", "Gold 200", "Warm, yellowish tones, slight grain", "film-outline", rgba(255, 190, 120, 0.25)),
            ("portra-400", "Portra", "Muted tones, soft skin rendering", "image-outline", rgba(220, 180, 170, 0.25)),
            ("superia", "Superia", "Cool greens, film contrast", "leaf-outline", rgba(130, 180, 160, 0.3)),
            ("polaroid-600", "Polaroid", "Faded pastel look, soft blur", "square-outline", rgba(200, 210, 230, 0.3)),
            ("hp5", "HP5 B&W", "Classic black and white", "contrast-outline", rgba(50, 50, 50, 0.6)),
            ("cinestill-800t", "CineStill", "Blue shadows, halation glow", "videocam-outline", rgba(80, 105, 160, 0.35)),
            ("vintage-vhs", "VHS", "Low contrast, scan lines", "tv-outline", rgba(180, 100, 120, 0.25)),
            ("lomo-lca", "Lomo", "Vignette and crushed blacks", "aperture-outline", rgba(70, 40, 90, 0.35)),
        ];
        filters.extend(film_looks.into_iter().map(|(id, name, description, icon, color)| {
            FilterSpec::builtin(id, name, description, icon, TransformKind::ColorOverlay(color), color)
        }));
        Self { filters }
    }

    /// Append LUT filters from a JSON catalog.
    ///
    /// Entries look like
    /// `{"name", "displayName", "filePath", "icon", "description"?, "id"?, "previewColor"?}`.
    /// A missing id is derived from `name`.
    pub fn with_catalog_json(mut self, json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<CatalogEntry> = serde_json::from_str(json)?;
        for entry in entries {
            let id = entry.id.unwrap_or_else(|| slug(&entry.name));
            if self.filters.iter().any(|f| f.id == id) {
                return Err(CatalogError::DuplicateId(id));
            }
            let fallback = match entry.preview_color {
                Some(value) => OverlayColor::parse_css(&value)
                    .ok_or_else(|| CatalogError::PreviewColor {
                        id: id.clone(),
                        value,
                    })?,
                None => OverlayColor::TRANSPARENT,
            };
            tracing::debug!("catalog: added LUT filter {id} -> {}", entry.file_path);
            self.filters.push(FilterSpec {
                id,
                display_name: entry.display_name,
                description: entry.description,
                icon: entry.icon,
                kind: TransformKind::LutAsset(entry.file_path),
                fallback,
            });
        }
        Ok(self)
    }

    /// Catalog entries in declaration order.
    pub fn list_filters(&self) -> impl Iterator<Item = &FilterSpec> + Clone + '_ {
        self.filters.iter()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn resolve(&self, id: &str) -> Result<&FilterSpec, UnknownFilter> {
        self.filters
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| UnknownFilter(id.to_owned()))
    }

    /// Like [`resolve`](Self::resolve), but unknown ids fall back to the
    /// identity filter.
    pub fn resolve_or_identity(&self, id: &str) -> &FilterSpec {
        match self.resolve(id) {
            Ok(spec) => spec,
            Err(err) => {
                tracing::warn!("{err}; using {IDENTITY_ID}");
                self.identity()
            }
        }
    }

    /// Default uniforms for a procedural filter.
    pub fn default_params(&self, id: &str) -> Option<ProgramParams> {
        match self.resolve(id).ok()?.kind {
            TransformKind::ShaderProgram(params) => Some(params),
            _ => None,
        }
    }

    fn identity(&self) -> &FilterSpec {
        &self.filters[0]
    }
}

/// `"Tokyo Deception"` → `"tokyo-deception"`.
fn slug(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
