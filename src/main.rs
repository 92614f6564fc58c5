
use std::env;
use std::io::Write;
use std::process::ExitCode;

use chrono::Local;
use log::{error,info,LevelFilter};

use nocsynth::{exit_status,get_version_number,options_from_matches,terminal_default_options,terminal_main};

fn setup_logger(verbose:bool)
{
	let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
	env_logger::builder()
		.filter_level(level)
		.parse_default_env()
		.format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
		.init();
}

fn print_usage(program:&str, opts:&getopts::Options)
{
	let brief = format!("Usage: {} [options] <maxlinks> <maxdegree> <program> [<args>...]",program);
	print!("{}",opts.usage(&brief));
}

fn main() -> ExitCode
{
	let args: Vec<String> = env::args().collect();
	let program = args.first().map(String::as_str).unwrap_or("nocsynth");
	let opts = terminal_default_options();
	let option_matches = match opts.parse(args.iter().skip(1))
	{
		Ok(m) => m,
		Err(f) =>
		{
			eprintln!("{}",f);
			print_usage(program,&opts);
			return ExitCode::from(2);
		},
	};
	if option_matches.opt_present("help")
	{
		print_usage(program,&opts);
		return ExitCode::SUCCESS;
	}
	setup_logger(option_matches.opt_present("verbose"));
	let (options,action) = match options_from_matches(&option_matches)
	{
		Ok(parsed) => parsed,
		Err(e) =>
		{
			error!("{}",e);
			print_usage(program,&opts);
			return ExitCode::from(2);
		},
	};
	info!("nocsynth {} started on {}",get_version_number(),Local::now().format("%Y-%m-%d %H:%M:%S"));
	let result = terminal_main(&options,action);
	if let Err(ref e) = result
	{
		error!("{}",e);
	}
	ExitCode::from(exit_status(&result))
}
