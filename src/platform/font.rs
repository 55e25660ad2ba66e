//! システムフォント取得の Facade
//!
//! Resolves the family the user asked for to concrete font bytes. Fallback
//! order, first hit wins:
//!
//! 1. the file named by `TEXTSAVER_FONT`
//! 2. the requested family
//! 3. the fallback family (a warning is logged from here on)
//! 4. any sans-serif face, then any installed face
//! 5. well-known per-OS font files

use anyhow::{Result, bail};
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[cfg(target_os = "linux")]
use crate::platform::os::linux;
#[cfg(target_os = "macos")]
use crate::platform::os::macos;
#[cfg(target_os = "windows")]
use crate::platform::os::windows;

/// フォントファイルを直接指定する環境変数
pub const FONT_ENV_VAR: &str = "TEXTSAVER_FONT";

#[allow(unreachable_code)]
pub fn system_font_candidates() -> Result<Vec<PathBuf>> {
    #[cfg(target_os = "windows")]
    {
        return windows::font::system_font_candidates();
    }
    #[cfg(target_os = "macos")]
    {
        return macos::font::system_font_candidates();
    }
    #[cfg(target_os = "linux")]
    {
        return linux::font::system_font_candidates();
    }

    bail!("system font is not supported on this OS yet");
}

/// 解決済みフォント
#[derive(Clone)]
pub struct ResolvedFont {
    /// 実際に使うファミリ名
    pub family: String,
    /// フォントファイル（コレクションの場合あり）
    pub data: Arc<Vec<u8>>,
    /// コレクション内のインデックス
    pub index: u32,
    /// 要求されたファミリと違うものを使っているか
    pub substituted: bool,
}

impl fmt::Debug for ResolvedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedFont")
            .field("family", &self.family)
            .field("bytes", &self.data.len())
            .field("index", &self.index)
            .field("substituted", &self.substituted)
            .finish()
    }
}

impl ResolvedFont {
    /// The stderr warning for a substituted family, `None` when the
    /// requested family was found.
    pub fn substitution_warning(&self, requested: &str) -> Option<String> {
        self.substituted
            .then(|| format!("⚠  Font “{}” not found; using {}", requested, self.family))
    }
}

pub struct FontResolver {
    db: Database,
    override_path: Option<PathBuf>,
}

impl FontResolver {
    /// システムフォントを読み込んで初期化
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("font db: {} faces loaded", db.len());

        let override_path = std::env::var_os(FONT_ENV_VAR).map(PathBuf::from);
        Self { db, override_path }
    }

    pub fn with_database(db: Database) -> Self {
        Self {
            db,
            override_path: None,
        }
    }

    pub fn with_override(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    /// Installed family names, sorted and deduplicated.
    pub fn families(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .db
            .faces()
            .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Installed spelling of `name`, matched case-insensitively.
    pub fn find_family(&self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.db
            .faces()
            .flat_map(|face| face.families.iter())
            .find(|(family, _)| family.eq_ignore_ascii_case(name))
            .map(|(family, _)| family.clone())
    }

    pub fn resolve(&self, requested: &str, fallback: &str) -> Result<ResolvedFont> {
        if let Some(path) = &self.override_path {
            match load_file(path) {
                Ok(font) => {
                    log::info!("font: using {} from {}", font.family, FONT_ENV_VAR);
                    return Ok(font);
                }
                Err(e) => log::warn!("font: ignoring {}={}: {}", FONT_ENV_VAR, path.display(), e),
            }
        }

        if let Some(family) = self.find_family(requested)
            && let Some(font) = self.load_family(Family::Name(&family), false)
        {
            log::info!("font: using {}", font.family);
            return Ok(font);
        }

        let substitute = self
            .find_family(fallback)
            .and_then(|family| self.load_family(Family::Name(&family), true))
            .or_else(|| self.load_family(Family::SansSerif, true))
            .or_else(|| self.load_first_face());

        if let Some(font) = substitute {
            // 利用者向けの警告は呼び出し側が出す
            log::debug!("font: \"{}\" substituted by {}", requested, font.family);
            return Ok(font);
        }

        for path in system_font_candidates()? {
            if let Ok(mut font) = load_file(&path) {
                font.substituted = true;
                log::debug!("font: \"{}\" substituted by {}", requested, path.display());
                return Ok(font);
            }
        }

        bail!("no usable font found (requested \"{requested}\")")
    }

    fn load_family(&self, family: Family<'_>, substituted: bool) -> Option<ResolvedFont> {
        let families = [family];
        let id = self.db.query(&Query {
            families: &families,
            weight: Weight::NORMAL,
            stretch: Stretch::Normal,
            style: Style::Normal,
        })?;
        self.load_face(id, substituted)
    }

    fn load_first_face(&self) -> Option<ResolvedFont> {
        let id = self.db.faces().next()?.id;
        self.load_face(id, true)
    }

    fn load_face(&self, id: fontdb::ID, substituted: bool) -> Option<ResolvedFont> {
        let family = self
            .db
            .face(id)?
            .families
            .first()
            .map(|(name, _)| name.clone())?;
        let (data, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))?;
        Some(ResolvedFont {
            family,
            data: Arc::new(data),
            index,
            substituted,
        })
    }
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// ファイルから直接読み込む（ファミリ名はファイル名で代用）
fn load_file(path: &Path) -> Result<ResolvedFont> {
    let data = std::fs::read(path)?;
    let family = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("custom")
        .to_string();
    Ok(ResolvedFont {
        family,
        data: Arc::new(data),
        index: 0,
        substituted: false,
    })
}
