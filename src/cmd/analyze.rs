use crate::reports;
use crate::Context;
use clap::Args;
use titleforge::api;
use titleforge::config::Config;
use titleforge::TfResult;

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub config: Config,

    /// Rows to show in the item table.
    #[arg(long, default_value_t = 15)]
    pub top: usize,
}

pub fn run(args: &AnalyzeArgs, ctx: &Context) -> TfResult<()> {
    let report = api::analyze(&ctx.items, ctx.as_of, &ctx.config)?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n🔎 === PERFORMANCE SIGNALS === 🔎");
    reports::tables::summary(&report.statistics, &ctx.config);
    reports::tables::items(&report.items, args.top);
    reports::tables::patterns("POSITIVE PATTERNS (Outliers)", &report.patterns.positive);
    reports::tables::patterns("NEGATIVE PATTERNS (Underperformers)", &report.patterns.negative);
    reports::tables::lifts(&report.lifts);
    reports::tables::readability_comparison(&report.readability);
    Ok(())
}
