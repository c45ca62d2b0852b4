//! Label command implementation.
use crate::{
    Result,
    command::common::{CommandContext, report_outcome},
    labels::LabelReconciler,
};

/// Add `labels` to issue or pull request `number`, dropping labels that are
/// mutually exclusive with them.
pub async fn execute(
    ctx: &CommandContext,
    number: u64,
    labels: &[String],
) -> Result<()> {
    let reconciler =
        LabelReconciler::new(ctx.config.labels.exclusion_groups.clone());

    let result = reconciler
        .add_labels(ctx.forge.as_ref(), number, labels)
        .await;

    report_outcome(&ctx.reporter, "Labelling", result, |outcome| {
        if outcome.changed {
            format!(
                "#{number} is now labelled: {}",
                outcome.to_apply.join(", ")
            )
        } else {
            format!("#{number} already had the requested labels")
        }
    })
    .await?;

    Ok(())
}
