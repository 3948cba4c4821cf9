extern crate argparse;
extern crate html2layout;
use argparse::{ArgumentParser, Store, StoreOption, StoreTrue};
use std::io;
use std::io::Write;
use std::process;

use html2layout::config::{self, Config};

fn translate<R>(conf: &Config, input: R, width: usize, text: bool, json: bool) -> String
where
    R: io::Read,
{
    let result = if json {
        conf.convert_from_read(input).map(|nodes| {
            serde_json::to_string_pretty(&nodes).expect("Layout nodes are serialisable")
        })
    } else if text {
        conf.string_from_read(input, width)
    } else {
        conf.markup_from_read(input)
    };
    match result {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Could not convert input: {}", e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let mut infile: Option<String> = None;
    let mut outfile: Option<String> = None;
    let mut styles: Option<String> = None;
    let mut width: usize = 80;
    let mut text: bool = false;
    let mut json: bool = false;

    {
        let mut ap = ArgumentParser::new();
        ap.refer(&mut infile).add_argument(
            "infile",
            StoreOption,
            "Input HTML file (default is standard input)",
        );
        ap.refer(&mut width).add_option(
            &["-w", "--width"],
            Store,
            "Column width for --text (default is 80)",
        );
        ap.refer(&mut outfile).add_option(
            &["-o", "--output"],
            StoreOption,
            "Output file (default is standard output)",
        );
        ap.refer(&mut text).add_option(
            &["-t", "--text"],
            StoreTrue,
            "Output a wrapped plain text preview",
        );
        ap.refer(&mut json)
            .add_option(&["--json"], StoreTrue, "Output the layout tree as JSON");
        ap.refer(&mut styles).add_option(
            &["-s", "--styles"],
            StoreOption,
            "TOML file of style table overrides",
        );
        ap.parse_args_or_exit();
    }

    let mut conf = config::default();
    if let Some(name) = styles {
        let overrides = std::fs::read_to_string(name).expect("Tried to read style file");
        conf = match conf.style_overrides_toml(&overrides) {
            Ok(conf) => conf,
            Err(e) => {
                eprintln!("{}", e);
                process::exit(1);
            }
        };
    }

    let data = match infile {
        None => {
            let stdin = io::stdin();
            let data = translate(&conf, &mut stdin.lock(), width, text, json);
            data
        }
        Some(name) => {
            let mut file = std::fs::File::open(name).expect("Tried to open file");
            translate(&conf, &mut file, width, text, json)
        }
    };

    match outfile {
        None => {
            print!("{}", data);
        }
        Some(name) => {
            let mut file = std::fs::File::create(name).expect("Tried to create file");
            write!(file, "{}", data).unwrap();
        }
    };
}
