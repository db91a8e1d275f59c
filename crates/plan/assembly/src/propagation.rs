//! Service propagation validation
//!
//! A stage may reuse another stage's service via `useFromStage`. The
//! reference is legal only when the source stage exists among prior
//! stages, does not itself propagate (chain depth is one), deploys
//! exactly one service, and matches the referencing stage's deployment
//! type. The prior-stages slice is caller-owned and read-only here.

use plan_types::{DeploymentStage, PlanError, PlanResult, ServiceConfig};

/// Validate the current stage's `useFromStage` reference against the
/// stages that precede it, returning the referenced stage's service
/// configuration by reference on success.
///
/// A reference that cannot be resolved (a typo) and a reference that is
/// structurally illegal (chained propagation, multi-service source,
/// deployment-type mismatch) surface as distinct error variants.
pub fn validate_use_from_stage<'a>(
    current: &DeploymentStage,
    prior_stages: &'a [DeploymentStage],
) -> PlanResult<&'a ServiceConfig> {
    let service = current
        .service_config()
        .ok_or(PlanError::MissingServiceFields)?;
    service.validate_service_source()?;

    let use_from = service
        .use_from_stage
        .as_ref()
        .ok_or(PlanError::MissingServiceFields)?;
    let stage_ref = use_from.stage.clone();

    let source = prior_stages
        .iter()
        .find(|stage| stage.identifier == stage_ref)
        .ok_or_else(|| PlanError::StageNotFound {
            stage: stage_ref.clone(),
        })?;

    if source.is_multi_service() {
        return Err(PlanError::MultiServicePropagation { stage: stage_ref });
    }

    let source_service = source
        .service_config()
        .ok_or_else(|| PlanError::StageNotFound {
            stage: stage_ref.clone(),
        })?;

    if source_service.propagates() {
        return Err(PlanError::ChainedPropagation { stage: stage_ref });
    }

    if let (Some(current_type), Some(source_type)) =
        (current.deployment_type(), source.deployment_type())
    {
        if current_type != source_type {
            return Err(PlanError::DeploymentTypeMismatch {
                stage: current.identifier.clone(),
                deployment_type: current_type,
                source_stage: source.identifier.clone(),
                source_type,
            });
        }
    }

    tracing::debug!(
        stage = %current.identifier,
        source_stage = %source.identifier,
        "service propagation validated"
    );
    Ok(source_service)
}
