use crate::reports;
use crate::Context;
use clap::Args;
use titleforge::api;
use titleforge::config::Config;
use titleforge::TfResult;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short = 't', long)]
    pub title: String,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

pub fn run(args: &OptimizeArgs, ctx: &Context) -> TfResult<()> {
    let report = api::optimize_title(
        &args.title,
        &ctx.items,
        None,
        ctx.as_of,
        &ctx.config,
        args.seed,
    )?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    reports::tables::patterns("POSITIVE PATTERNS (Outliers)", &report.patterns.positive);
    reports::tables::walk(&report);

    println!("\n=== 🏆 FINAL RESULT ===");
    println!("Score: {:.1}", report.best_title.fitness_score);
    println!("Title: {}", report.best_title.text);
    Ok(())
}
