/*!

Launching the external simulator.

The simulator is run as `<program> <leading arguments> --x86-sim detailed --x86-max-inst N --x86-config ... --net-report ...` and waited for up to a timeout. Its standard output and error are collected together to extract the [`SimulationSummary`].

*/

use std::io::Read;
use std::path::{Path,PathBuf};
use std::process::{Command,Stdio};
use std::thread::{self,JoinHandle};
use std::time::{Duration,Instant};

use indicatif::ProgressBar;
use log::{debug,info,warn};

use crate::error::Error;
use crate::multi2sim::{CONTEXT_FILE,CPU_FILE,MEMORY_FILE};
use crate::report::SimulationSummary;

pub const DEFAULT_PROGRAM: &str = "m2s";
pub const DEFAULT_MAX_INSTRUCTIONS: u64 = 100_000_000;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3600);
const POLL_INTERVAL: Duration = Duration::from_millis(50);
///How long the output readers may take to finish once the simulator is gone.
const PIPE_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug,Clone,PartialEq,Eq)]
pub struct Simulator
{
	pub program: String,
	///Arguments placed before the ones built here. Allows wrappers such as `nice -n 10 m2s`.
	pub leading_arguments: Vec<String>,
	pub max_instructions: u64,
	///Wall-clock limit for one simulation. Exceeding it kills the simulator.
	pub timeout: Duration,
}

///What a successful simulation left.
#[derive(Debug,Clone)]
pub struct SimulatorRun
{
	///Standard output followed by standard error.
	pub output: String,
	pub summary: SimulationSummary,
	pub network_report: PathBuf,
	pub elapsed: Duration,
}

impl Default for Simulator
{
	fn default() -> Simulator
	{
		Simulator{
			program: DEFAULT_PROGRAM.to_string(),
			leading_arguments: vec![],
			max_instructions: DEFAULT_MAX_INSTRUCTIONS,
			timeout: DEFAULT_TIMEOUT,
		}
	}
}

impl Simulator
{
	///Builds a simulator from a command such as `m2s` or `/opt/m2s/bin/m2s` or `nice m2s`.
	pub fn from_command(command:&str) -> Result<Simulator,Error>
	{
		let mut words = command.split_whitespace().map(str::to_string);
		let program = words.next().ok_or_else(||error!(bad_argument).with_message("empty simulator command".to_string()))?;
		Ok(Simulator{
			program,
			leading_arguments: words.collect(),
			..Simulator::default()
		})
	}
	///The full argument list for a simulation over the files in `directory`.
	pub fn arguments(&self, directory:&Path, network_config:&Path, network_report:&Path) -> Vec<String>
	{
		let path = |file:&str|directory.join(file).to_string_lossy().into_owned();
		let mut arguments = self.leading_arguments.clone();
		arguments.extend(vec![
			"--x86-sim".to_string(), "detailed".to_string(),
			"--x86-max-inst".to_string(), self.max_instructions.to_string(),
			"--x86-config".to_string(), path(CPU_FILE),
			"--ctx-config".to_string(), path(CONTEXT_FILE),
			"--mem-config".to_string(), path(MEMORY_FILE),
			"--net-config".to_string(), network_config.to_string_lossy().into_owned(),
			"--net-report".to_string(), network_report.to_string_lossy().into_owned(),
		]);
		arguments
	}
	///Runs a simulation and waits for it. A non-zero exit or reaching the timeout are errors.
	pub fn run(&self, directory:&Path, network_config:&Path, network_report:&Path) -> Result<SimulatorRun,Error>
	{
		let arguments = self.arguments(directory,network_config,network_report);
		debug!("launching {} {}",self.program,arguments.join(" "));
		let mut child = Command::new(&self.program)
			.args(&arguments)
			.stdin(Stdio::null())
			.stdout(Stdio::piped())
			.stderr(Stdio::piped())
			.spawn()
			.map_err(|err|error!(could_not_launch_simulator,self.program.clone(),err))?;
		let stdout = child.stdout.take().map(collect_pipe);
		let stderr = child.stderr.take().map(collect_pipe);
		let spinner = ProgressBar::new_spinner();
		spinner.set_message(format!("simulating {}",network_config.display()));
		spinner.enable_steady_tick(100);
		let start = Instant::now();
		let status = loop
		{
			match child.try_wait()
			{
				Ok(Some(status)) => break status,
				Ok(None) =>
				{
					if start.elapsed()>=self.timeout
					{
						let _ = child.kill();
						let _ = child.wait();
						spinner.finish_and_clear();
						let deadline = Instant::now()+PIPE_GRACE;
						join_pipe(stdout,deadline);
						join_pipe(stderr,deadline);
						return Err(error!(simulator_timeout,self.timeout.as_secs()).with_message(format!("{} killed after {:?}",self.program,start.elapsed())));
					}
					thread::sleep(POLL_INTERVAL);
				},
				Err(err) =>
				{
					spinner.finish_and_clear();
					return Err(error!(could_not_launch_simulator,self.program.clone(),err).with_message("lost track of the simulator process".to_string()));
				},
			}
		};
		spinner.finish_and_clear();
		let elapsed = start.elapsed();
		let deadline = Instant::now()+PIPE_GRACE;
		let mut output = join_pipe(stdout,deadline);
		output.push_str(&join_pipe(stderr,deadline));
		if !status.success()
		{
			let tail:Vec<&str> = output.lines().rev().take(5).collect();
			return Err(error!(simulator_failed,status.code()).with_message(format!("last output lines: {:?}",tail)));
		}
		info!("simulation of {} took {:.1}s",network_config.display(),elapsed.as_secs_f64());
		let summary = SimulationSummary::parse(&output);
		Ok(SimulatorRun{
			output,
			summary,
			network_report: network_report.to_path_buf(),
			elapsed,
		})
	}
}

fn collect_pipe<R:Read+Send+'static>(mut pipe:R) -> JoinHandle<String>
{
	thread::spawn(move||{
		let mut buffer = vec![];
		let _ = pipe.read_to_end(&mut buffer);
		String::from_utf8_lossy(&buffer).into_owned()
	})
}

///Waits for a reader until `deadline`. A process inherited by the simulator may keep the pipe open after it ends; then the reader is abandoned and its output lost.
fn join_pipe(handle:Option<JoinHandle<String>>, deadline:Instant) -> String
{
	let handle = match handle
	{
		Some(handle) => handle,
		None => return String::new(),
	};
	while !handle.is_finished()
	{
		if Instant::now()>=deadline
		{
			warn!("the simulator output is still open after it ended; ignoring the rest of it");
			return String::new();
		}
		thread::sleep(POLL_INTERVAL);
	}
	handle.join().unwrap_or_default()
}
