//! `stackdiff print`: render one profile with the diff table layout.

use clap::Args;

use crate::{
    Config, DiffError, DiffOutput, DiffResult, Profile, TableOptions, expand_profile_args,
    render_comparison,
};

#[derive(Debug, Clone, Args)]
pub struct PrintArgs {
    /// Profile file, or a glob matching exactly one file.
    #[arg(value_name = "PROFILE")]
    pub profile: String,

    #[command(flatten)]
    pub table: TableOptions,
}

pub fn print_command(
    config: &Config,
    args: &PrintArgs,
    json: bool,
    no_color: bool,
) -> DiffResult<DiffOutput> {
    let paths = expand_profile_args(std::slice::from_ref(&args.profile))?;
    let [path] = paths.as_slice() else {
        return Err(DiffError::InvalidArgument(format!(
            "\"print\" takes exactly one profile ({:?} matched {})",
            args.profile,
            paths.len()
        )));
    };
    let settings = args.table.resolve(config, no_color)?;
    let profile = Profile::load(path)?;
    Ok(render_comparison(std::slice::from_ref(&profile), &settings, json))
}
