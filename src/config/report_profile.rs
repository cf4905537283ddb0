// ==========================================
// Wood QC Report - Report profile
// ==========================================
// Responsibility: laboratory texts and decorations printed on every certificate
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Header image placement, in millimetres from the page's top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoPlacement {
    pub path: PathBuf,
    pub x_mm: f64,
    pub y_mm: f64,
    pub width_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportProfile {
    pub title: String,
    pub method_label: String,
    pub note: String,
    pub supervisor_line: String,
    pub page_label: String,
    pub logos: Vec<LogoPlacement>,
    /// Base directory for relative logo paths; the working directory when unset.
    pub asset_dir: Option<PathBuf>,
    /// File stem used when the sample has no identifier.
    pub fallback_file_stem: String,
}

impl Default for ReportProfile {
    fn default() -> Self {
        Self {
            title: "Relatório de Ensaio".to_string(),
            method_label: "Metodo UFV 01".to_string(),
            note: "Nota: Resultados restritos as amostras".to_string(),
            supervisor_line: "Dr. Vinicius Resende de Castro - Supervisor do laboratório"
                .to_string(),
            page_label: "Página".to_string(),
            logos: vec![
                LogoPlacement {
                    path: PathBuf::from("logo_ufv.jpg"),
                    x_mm: 10.0,
                    y_mm: 8.0,
                    width_mm: 25.0,
                },
                LogoPlacement {
                    path: PathBuf::from("logo_montana.jpg"),
                    x_mm: 155.0,
                    y_mm: 8.0,
                    width_mm: 45.0,
                },
            ],
            asset_dir: None,
            fallback_file_stem: "Relatorio".to_string(),
        }
    }
}

impl ReportProfile {
    pub fn logo_path(&self, logo: &LogoPlacement) -> PathBuf {
        match &self.asset_dir {
            Some(dir) if logo.path.is_relative() => dir.join(&logo.path),
            _ => logo.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_logos_resolve_against_asset_dir() {
        let profile = ReportProfile {
            asset_dir: Some(PathBuf::from("/srv/lab")),
            ..ReportProfile::default()
        };
        assert_eq!(
            profile.logo_path(&profile.logos[0]),
            PathBuf::from("/srv/lab/logo_ufv.jpg")
        );
        assert_eq!(
            ReportProfile::default().logo_path(&profile.logos[1]),
            PathBuf::from("logo_montana.jpg")
        );
    }
}
