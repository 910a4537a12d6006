// Copyright 2025 The RestAssert Authors
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rest_assert::config::Config;
use rest_assert::RestAssert;

#[doc(hidden)]
#[macro_export]
macro_rules! handle_error {
    ($code:expr, $msg:expr, $($arg:tt)*) => {
        println!($msg, $($arg)*);
        std::process::exit($code);
    };

    ($code:expr, $msg:expr) => {
        println!($msg);
        std::process::exit($code);
    };
}

#[doc(hidden)]
struct Code;

impl Code {
    const SUCCESS: i32 = 0;
    const INVALID_ARGUMENT: i32 = 2;
    const CONFIG_ERROR: i32 = 3;
    const CHECK_FAILURE: i32 = 4;
}

const BASE_URL_KEY: &str = "BASE_URL";

#[doc(hidden)]
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Base URL of the service instance to check
    #[clap(short, long)]
    url: Option<String>,

    /// JSON config file holding a BASE_URL key
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Field name to exclude from structural comparisons (repeatable)
    #[clap(short, long)]
    ignore: Vec<String>,
}

#[doc(hidden)]
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(config) => config,
            Err(err) => {
                handle_error!(Code::CONFIG_ERROR, "Error: {}", err);
            }
        },
        None => Config::new(),
    };

    // --url wins; otherwise the config file, then the environment.
    let url = match cli.url {
        Some(url) => url,
        None => match config.get_str(BASE_URL_KEY) {
            Ok(url) => url,
            Err(err) => {
                handle_error!(Code::INVALID_ARGUMENT, "Error: no base URL given: {}", err);
            }
        },
    };

    let mut rest_assert = RestAssert::new().with_url(url.as_str());
    for field in &cli.ignore {
        rest_assert = rest_assert.ignore_field(field);
    }

    let report = rest_assert.run().await;
    println!("{}", report);

    if report.passed() {
        std::process::exit(Code::SUCCESS);
    }
    std::process::exit(Code::CHECK_FAILURE);
}
