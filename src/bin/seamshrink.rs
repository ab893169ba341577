// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use seamshrink::config::{DEFAULT_EXTENSION, DEFAULT_OUTPUT_DIR};
use seamshrink::{run, CarveError, Config};
use std::process;

extern crate clap;

use clap::{App, AppSettings, Arg, ArgMatches};
use env_logger::Env;
use log::{error, info, warn};

fn config_from(matches: &ArgMatches) -> Result<Config, failure::Error> {
    // Both positionals are required, so clap has already refused a
    // command line without them.
    let input = matches.value_of("INPUT").unwrap_or_default();
    let width = matches.value_of("WIDTH").unwrap_or_default();
    let target_width = width
        .parse::<i64>()
        .map_err(|_| failure::format_err!("target width must be an integer, got {:?}", width))?;

    let mut config = Config::new(input, target_width);
    if let Some(dir) = matches.value_of("output-dir") {
        config.output_dir = dir.into();
    }
    if let Some(ext) = matches.value_of("format") {
        config.extension = ext.to_string();
    }
    config.final_only = matches.is_present("final-only");
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let matches = App::new("seamshrink")
        .version(clap::crate_version!())
        .about("Narrow an image by carving out its least important seams")
        .setting(AppSettings::AllowNegativeNumbers)
        .arg(
            Arg::with_name("INPUT")
                .help("The image to narrow")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("WIDTH")
                .help("The width to narrow it to, in pixels")
                .required(true)
                .index(2),
        )
        .arg(
            Arg::with_name("output-dir")
                .long("output-dir")
                .short("o")
                .takes_value(true)
                .default_value(DEFAULT_OUTPUT_DIR)
                .help("Directory the frames are written to"),
        )
        .arg(
            Arg::with_name("format")
                .long("format")
                .short("f")
                .takes_value(true)
                .default_value(DEFAULT_EXTENSION)
                .help("File extension, and so format, of every frame"),
        )
        .arg(
            Arg::with_name("final-only")
                .long("final-only")
                .help("Write only the final frame"),
        )
        .get_matches();

    let outcome = config_from(&matches).and_then(|config| run(&config).map_err(Into::into));
    match outcome {
        Ok(carved) => {
            if carved.failed_frames > 0 {
                warn!("{} intermediate frames could not be written", carved.failed_frames);
            }
            info!(
                "done: {}x{} after {} steps",
                carved.image.width(),
                carved.image.height(),
                carved.steps
            );
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("seamshrink: {}", e);
            let status = match e.downcast_ref::<CarveError>() {
                Some(CarveError::Usage { .. }) => 2,
                _ => 1,
            };
            process::exit(status);
        }
    }
}
