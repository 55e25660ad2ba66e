//! macOS のシステムフォント取得

use anyhow::Result;
use std::path::PathBuf;

/// macOS のシステムフォント候補を返す
pub fn system_font_candidates() -> Result<Vec<PathBuf>> {
    Ok(vec![
        PathBuf::from("/System/Library/Fonts/Supplemental/Arial.ttf"),
        PathBuf::from("/Library/Fonts/Arial.ttf"),
        // fallback
        PathBuf::from("/System/Library/Fonts/Helvetica.ttc"),
        PathBuf::from("/System/Library/Fonts/SFNS.ttf"),
    ])
}
