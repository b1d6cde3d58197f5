//! 配置校验模块
//!
//! 校验规则：
//! - 派生规则 (`validator`): fps、dense_points、max_workers 等取值范围
//! - 浮点字段必须为有限值
//! - max_workers 上限

use std::collections::BTreeMap;

use contracts::ReplayConfig;
use contracts::ReplayError;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 工作线程数上限
const MAX_WORKERS_LIMIT: usize = 1024;

/// 校验 ReplayConfig 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(config: &ReplayConfig) -> Result<(), ReplayError> {
    validate_derived(config)?;
    validate_finite_fields(config)?;
    validate_workers(config)?;
    Ok(())
}

/// 执行派生的范围校验
fn validate_derived(config: &ReplayConfig) -> Result<(), ReplayError> {
    match config.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let (field, message) = first_violation(&errors, String::new())
                .unwrap_or_else(|| ("config".to_string(), errors.to_string()));
            Err(ReplayError::config_validation(field, message))
        }
    }
}

/// 按字段名排序，深度优先取第一个违规项
fn first_violation(errors: &ValidationErrors, prefix: String) -> Option<(String, String)> {
    let sorted: BTreeMap<_, _> = errors.errors().iter().collect();
    for (name, kind) in sorted {
        let path = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}.{name}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                if let Some(err) = list.first() {
                    let mut params: Vec<String> = err
                        .params
                        .iter()
                        .map(|(k, v)| format!("{k}={v}"))
                        .collect();
                    params.sort();
                    return Some((
                        path,
                        format!("failed '{}' check ({})", err.code, params.join(", ")),
                    ));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                if let Some(found) = first_violation(inner, path) {
                    return Some(found);
                }
            }
            ValidationErrorsKind::List(items) => {
                for (idx, inner) in items {
                    if let Some(found) = first_violation(inner, format!("{path}[{idx}]")) {
                        return Some(found);
                    }
                }
            }
        }
    }
    None
}

/// 校验浮点字段 (NaN 能绕过范围校验)
fn validate_finite_fields(config: &ReplayConfig) -> Result<(), ReplayError> {
    let fields = [
        ("projector.track_width", config.projector.track_width),
        (
            "synthesizer.grid_order_threshold_m",
            config.synthesizer.grid_order_threshold_m,
        ),
        ("synthesizer.out_epsilon_m", config.synthesizer.out_epsilon_m),
    ];

    for (field, value) in fields {
        if !value.is_finite() {
            return Err(ReplayError::config_validation(
                field,
                format!("must be a finite number, got {value}"),
            ));
        }
    }
    Ok(())
}

/// 校验工作线程数
fn validate_workers(config: &ReplayConfig) -> Result<(), ReplayError> {
    if let Some(workers) = config.resampler.max_workers {
        if workers > MAX_WORKERS_LIMIT {
            return Err(ReplayError::config_validation(
                "resampler.max_workers",
                format!("max_workers must be <= {MAX_WORKERS_LIMIT}, got {workers}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        assert!(validate(&ReplayConfig::default()).is_ok());
    }

    #[test]
    fn test_invalid_fps() {
        let mut config = ReplayConfig::default();
        config.fps = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("fps"), "{err}");
    }

    #[test]
    fn test_nested_field_path() {
        let mut config = ReplayConfig::default();
        config.projector.dense_points = 1;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("projector.dense_points"), "{err}");
    }

    #[test]
    fn test_nan_rejected() {
        let mut config = ReplayConfig::default();
        config.synthesizer.out_epsilon_m = f64::NAN;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("out_epsilon_m"), "{err}");
    }

    #[test]
    fn test_too_many_workers() {
        let mut config = ReplayConfig::default();
        config.resampler.max_workers = Some(MAX_WORKERS_LIMIT + 1);
        assert!(validate(&config).is_err());
    }
}
