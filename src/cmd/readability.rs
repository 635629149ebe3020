use crate::reports;
use clap::Args;
use serde_json::json;
use titleforge::readability::{character_readability, flesch_kincaid};
use titleforge::TfResult;

#[derive(Args, Debug, Clone)]
pub struct ReadabilityArgs {
    #[arg(short = 't', long)]
    pub text: String,
}

pub fn run(args: &ReadabilityArgs, as_json: bool) -> TfResult<()> {
    let chars = character_readability(&args.text);
    let fk = flesch_kincaid(&args.text);

    if as_json {
        let out = json!({ "character": chars, "fleschKincaid": fk });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    reports::tables::text_readability(&args.text, &chars, &fk);
    Ok(())
}
