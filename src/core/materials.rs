use crate::domain::model::RawMaterialBreakdown;
use crate::utils::error::{LabelError, Result};

// 每半批重量的配方比例
const DOSA_RICE_RATIO: f64 = 0.674;
const IDLY_RICE_RATIO: f64 = 0.076;
const URAD_DAL_RATIO: f64 = 0.250;
const FENUGREEK_RATIO: f64 = 0.003;

const SALT_BASE_MULTIPLIER: f64 = 1.5;
const SALT_RATIO: f64 = 0.0085;

/// Split an estimated batch weight (kg) into raw material quantities.
pub fn calculate_raw_materials(estimated_weight: f64) -> Result<RawMaterialBreakdown> {
    if !estimated_weight.is_finite() || estimated_weight <= 0.0 {
        return Err(LabelError::InvalidWeight {
            input: estimated_weight.to_string(),
            reason: "estimated weight must be a positive number".to_string(),
        });
    }

    let half = estimated_weight / 2.0;
    let dosa_rice = half * DOSA_RICE_RATIO;
    let idly_rice = half * IDLY_RICE_RATIO;
    let urad_dal = half * URAD_DAL_RATIO;
    let fenugreek = half * FENUGREEK_RATIO;

    let grains = dosa_rice + idly_rice + urad_dal + fenugreek;
    let salt = grains * SALT_BASE_MULTIPLIER * SALT_RATIO;

    Ok(RawMaterialBreakdown {
        estimated_weight,
        dosa_rice,
        idly_rice,
        urad_dal,
        fenugreek,
        salt,
        total_weight: (grains + salt) * 2.0,
    })
}

/// Parse user input such as `"12.5"` before calculating.
pub fn calculate_raw_materials_from_input(raw: &str) -> Result<RawMaterialBreakdown> {
    let weight: f64 = raw.trim().parse().map_err(|_| LabelError::InvalidWeight {
        input: raw.to_string(),
        reason: "not a number".to_string(),
    })?;
    calculate_raw_materials(weight)
}
