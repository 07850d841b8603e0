//! Built-in sample set.
//!
//! Three formulations spanning Newtonian buffer to a strongly shear-thinning,
//! high-concentration antibody solution. Used when no `--samples` file is given
//! and by `visco init`.

use crate::domain::ModelParams;

pub fn default_samples() -> Vec<ModelParams> {
    vec![
        ModelParams {
            id: "sample-a".to_string(),
            name: "Sample A (Buffer)".to_string(),
            zero_shear_viscosity: 1.2,
            infinite_shear_viscosity: 1.0,
            relaxation_time: 0.01,
            power_index: 0.98,
            color: "#94a3b8".to_string(),
        },
        ModelParams {
            id: "sample-b".to_string(),
            name: "Sample B (mAb 50mg/mL)".to_string(),
            zero_shear_viscosity: 8.5,
            infinite_shear_viscosity: 4.0,
            relaxation_time: 0.5,
            power_index: 0.85,
            color: "#3b82f6".to_string(),
        },
        ModelParams {
            id: "sample-c".to_string(),
            name: "Sample C (mAb 150mg/mL + Clusters)".to_string(),
            zero_shear_viscosity: 45.0,
            infinite_shear_viscosity: 12.0,
            relaxation_time: 2.5,
            power_index: 0.6,
            color: "#ef4444".to_string(),
        },
    ]
}
