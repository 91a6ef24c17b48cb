//! Shared helpers for configuration tests

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// 2024-01-01T00:00:00Z
pub const MIDNIGHT_UTC: u64 = 1_704_067_200_000;

/// Station directory holding `config.json` and optional compensation files
pub struct StationDir {
    dir: TempDir,
}

impl StationDir {
    pub fn new() -> Self {
        Self { dir: tempfile::tempdir().expect("temp dir") }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write `contents` to `name` and return its path
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, contents).expect("write station file");
        path
    }
}

/// Compensation document with easily recognisable coefficients
pub const CUSTOM_COMPENSATION: &str = r#"{
  "weather": {
    "true": {
      "comp_temp_cub_a": 0.0, "comp_temp_cub_b": 0.0, "comp_temp_cub_c": 1.0, "comp_temp_cub_d": -3.0,
      "comp_hum_quad_a": 0.0, "comp_hum_quad_b": 1.0, "comp_hum_quad_c": 5.0
    },
    "false": {
      "enable_eco2_tvoc": {
        "false": {
          "comp_temp_cub_a": 0.0, "comp_temp_cub_b": 0.0, "comp_temp_cub_c": 1.0, "comp_temp_cub_d": -1.0,
          "comp_hum_quad_a": 0.0, "comp_hum_quad_b": 1.0, "comp_hum_quad_c": 2.0
        }
      }
    }
  },
  "red_temp_comp_factor": 0.0, "red_hum_comp_factor": 0.0, "red_bar_comp_factor": 0.0,
  "oxi_temp_comp_factor": 0.0, "oxi_hum_comp_factor": 0.0, "oxi_bar_comp_factor": 0.0,
  "nh3_temp_comp_factor": 0.0, "nh3_hum_comp_factor": 0.0, "nh3_bar_comp_factor": 0.0
}"#;
