/*!
nocsynth
=====

Synthesis of application-specific topologies for the on-chip network of a multi-core chip.

The application is first simulated over a fully-connected network. The traffic observed on each link gives a weighted graph of switches, which is then reduced until it has at most `maxlinks` links and no switch has more than `maxdegree` of them, without ever disconnecting it. The traffic of every removed link is moved onto the least-traffic path that remains, so the links that keep the traffic are the ones that survive.

# Usage

```ignore
nocsynth [options] <maxlinks> <maxdegree> <program> [<args>...]
```

`maxlinks` must be at least 9 and `maxdegree` at least 4. The simulator (Multi2Sim, `m2s` by default) is launched over the generated configuration files:
* `ctx-config.txt`, `cpu-config.txt` and `mem-config.txt` describe the program, the cores and the cache hierarchy.
* `fully-net-config.txt` is the fully-connected network used for profiling and `fully-net-report.txt` the traffic it recorded.
* `novel-net-config.txt` is the synthesized network.

With `--action=compare --topology=<name>` the program is simulated over the chosen network instead, one of `novel`, `fully`, `ring`, `mesh` or `torus`, to compare their statistics.

# Library

* [`report::NetworkReport`] reads the traffic graph from a network report.
* [`synthesize`] reduces a traffic graph, see the [`reduction`] module for the algorithm.
* [`multi2sim`] writes the configuration files, including the synthesized topology.
* [`simulator::Simulator`] runs the simulator with a timeout.
* [`synthesis_main`] and [`comparison_main`] perform the whole process, as the binary does.

*/

#[macro_use]
pub mod error;
pub mod matrix;
pub mod topology;
pub mod reduction;
pub mod report;
pub mod multi2sim;
pub mod simulator;

use std::fmt::{self,Display,Formatter};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::Local;
use log::{info,warn};

pub use error::{Error,ErrorKind};
use multi2sim::{generate_file,generate_network_file,generate_system_files,network_config_name,network_report_name,write_network};
pub use reduction::{reduce,Reduction,ReductionLimits,ReductionOutcome};
pub use report::{NetworkReport,SimulationSummary};
pub use simulator::Simulator;
use topology::cartesian::StandardTopology;
pub use topology::{Edge,TrafficGraph,Weight,WeightedEdge};

pub const MINIMUM_LINKS: usize = 9;
pub const MINIMUM_DEGREE: usize = 4;
pub const MINIMUM_CORES: usize = 3;
pub const DEFAULT_CORES: usize = 9;
///Name of the synthesized topology in file names.
pub const NOVEL: &str = "novel";

///Everything needed to run a synthesis or a comparison.
#[derive(Debug,Clone)]
pub struct SynthesisOptions
{
	pub limits: ReductionLimits,
	///Number of cores, each with its own switch.
	pub cores: usize,
	///The program to simulate and its arguments.
	pub executable: String,
	pub arguments: Vec<String>,
	pub simulator: Simulator,
	///Where the configuration files and reports are written.
	pub directory: PathBuf,
	///A report of a previous fully-connected simulation. When given no profiling simulation is made.
	pub report: Option<PathBuf>,
}

impl SynthesisOptions
{
	pub fn new(max_links:usize, max_degree:usize, executable:&str) -> SynthesisOptions
	{
		SynthesisOptions{
			limits: ReductionLimits{max_links,max_degree},
			cores: DEFAULT_CORES,
			executable: executable.to_string(),
			arguments: vec![],
			simulator: Simulator::default(),
			directory: PathBuf::from("."),
			report: None,
		}
	}
	///Checks the lower bounds of the parameters.
	pub fn validate(&self) -> Result<(),Error>
	{
		if self.limits.max_links<MINIMUM_LINKS
		{
			return Err(error!(bad_argument).with_message(format!("maxlinks must be at least {}, got {}",MINIMUM_LINKS,self.limits.max_links)));
		}
		if self.limits.max_degree<MINIMUM_DEGREE
		{
			return Err(error!(bad_argument).with_message(format!("maxdegree must be at least {}, got {}",MINIMUM_DEGREE,self.limits.max_degree)));
		}
		if self.cores<MINIMUM_CORES
		{
			return Err(error!(bad_argument).with_message(format!("there must be at least {} cores, got {}",MINIMUM_CORES,self.cores)));
		}
		if self.executable.is_empty()
		{
			return Err(error!(bad_argument).with_message("no program to simulate".to_string()));
		}
		Ok(())
	}
	fn prepare_directory(&self) -> Result<(),Error>
	{
		fs::create_dir_all(&self.directory).map_err(|err|error!(could_not_generate_file,self.directory.clone(),err).with_message("could not create the output directory.".to_string()))
	}
}

///Reduces the traffic graph to the limits. The graph must be connected; partial results of the reduction are reported in the outcome, not as errors.
pub fn synthesize(graph:&TrafficGraph, limits:ReductionLimits) -> Result<Reduction,Error>
{
	if !graph.is_connected()
	{
		return Err(error!(disconnected_traffic).with_message(format!("{} switches in {} components",graph.num_nodes(),graph.components().len())));
	}
	Ok(reduce(graph.clone(),limits))
}

///Profiles the program over a fully-connected network, synthesizes a topology from its traffic and writes it as `novel-net-config.txt`.
pub fn synthesis_main(options:&SynthesisOptions) -> Result<Reduction,Error>
{
	options.validate()?;
	options.prepare_directory()?;
	let directory = options.directory.as_path();
	let report_path = match options.report
	{
		Some(ref path) =>
		{
			info!("using existing report {}",path.display());
			path.clone()
		},
		None =>
		{
			generate_system_files(directory,options.cores,&options.executable,&options.arguments)?;
			let fully = StandardTopology::FullyConnected;
			let config = generate_network_file(directory,fully.name(),options.cores,"fully-connected",&fully.links(options.cores))?;
			let report = directory.join(network_report_name(fully.name()));
			info!("profiling {} over a fully-connected network",options.executable);
			let run = options.simulator.run(directory,&config,&report)?;
			print_simulation_summary(&run.summary);
			report
		},
	};
	let report = NetworkReport::read(&report_path)?;
	print_network_statistics(&report);
	if let Some(outside) = report.graph.nodes().find(|&node|node>=options.cores)
	{
		return Err(error!(bad_argument).with_message(format!("the report has switch {} but there are only {} cores",outside,options.cores)));
	}
	let reduction = synthesize(&report.graph,options.limits)?;
	if !reduction.outcome.is_feasible()
	{
		warn!("target not fully met: {} links (max {}), maximum degree {} (max {})",
			reduction.outcome.links,options.limits.max_links,reduction.outcome.maximum_degree,options.limits.max_degree);
	}
	let path = directory.join(network_config_name(NOVEL));
	let links = reduction.graph.links();
	generate_file(&path,|out|{
		writeln!(out,"; synthesized on {} with maxlinks = {} and maxdegree = {}",Local::now().format("%Y-%m-%d %H:%M:%S"),options.limits.max_links,options.limits.max_degree)?;
		write_network(out,options.cores,NOVEL,&links)
	})?;
	print_topology_comparison(options.cores,&reduction.graph);
	println!("novel NoC topology written to \"{}\" for use by Multi2Sim",path.display());
	Ok(reduction)
}

///The network to simulate in a comparison.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum TopologyChoice
{
	///The one previously written by `synthesis_main`.
	Novel,
	Standard(StandardTopology),
}

impl TopologyChoice
{
	pub fn name(&self) -> &'static str
	{
		match self
		{
			TopologyChoice::Novel => NOVEL,
			TopologyChoice::Standard(topology) => topology.name(),
		}
	}
}

impl Display for TopologyChoice
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		write!(formatter,"{}",self.name())
	}
}

impl FromStr for TopologyChoice
{
	type Err = Error;
	fn from_str(name:&str) -> Result<TopologyChoice,Error>
	{
		if name==NOVEL
		{
			Ok(TopologyChoice::Novel)
		}
		else
		{
			name.parse().map(TopologyChoice::Standard)
		}
	}
}

///What a comparison run measured.
#[derive(Debug,Clone)]
pub struct Comparison
{
	pub topology: TopologyChoice,
	pub summary: SimulationSummary,
	pub report: NetworkReport,
}

///Simulates the program over one of the topologies and reports its statistics.
///The standard topologies are written every time; the novel one must have been synthesized before into the same directory.
pub fn comparison_main(options:&SynthesisOptions, topology:TopologyChoice) -> Result<Comparison,Error>
{
	options.validate()?;
	options.prepare_directory()?;
	let directory = options.directory.as_path();
	generate_system_files(directory,options.cores,&options.executable,&options.arguments)?;
	for standard in StandardTopology::ALL.iter()
	{
		generate_network_file(directory,standard.name(),options.cores,standard.name(),&standard.links(options.cores))?;
	}
	let config = directory.join(network_config_name(topology.name()));
	if !config.is_file()
	{
		return Err(error!(could_not_open_file,config.clone(),std::io::Error::from(std::io::ErrorKind::NotFound))
			.with_message("synthesize the novel topology first.".to_string()));
	}
	let report_path = directory.join(network_report_name(topology.name()));
	info!("simulating {} over the {} topology",options.executable,topology);
	let run = options.simulator.run(directory,&config,&report_path)?;
	print_simulation_summary(&run.summary);
	let report = NetworkReport::read(&report_path)?;
	print_network_statistics(&report);
	Ok(Comparison{
		topology,
		summary: run.summary,
		report,
	})
}

pub fn print_simulation_summary(summary:&SimulationSummary)
{
	println!("Instructions: {}",summary.committed_instructions);
	println!("Nanoseconds: {}",summary.simulated_nanoseconds);
	println!("Cycles: {}",summary.cycles);
}

pub fn print_network_statistics(report:&NetworkReport)
{
	println!("NoC Transfers (# Packets Sent): {}",report.transfers);
	println!("NoC Avg. Message (Packet) Size: {}",report.average_message_size);
	println!("NoC Average Latency (in Cycles): {}",report.average_latency);
	println!("NoC Total Traffic (bytes): {}",report.total_traffic);
}

///Prints links, degree and distances of the synthesized topology next to the standard ones.
pub fn print_topology_comparison(cores:usize, novel:&TrafficGraph)
{
	let show = |value:Option<String>|value.unwrap_or_else(||"-".to_string());
	println!("{:>8} {:>6} {:>7} {:>9} {:>9}","topology","links","degree","diameter","avg.hops");
	let mut rows = vec![(NOVEL,novel.metrics())];
	for standard in StandardTopology::ALL.iter()
	{
		rows.push((standard.name(),TrafficGraph::from_links(standard.links(cores)).metrics()));
	}
	for (name,metrics) in rows
	{
		println!("{:>8} {:>6} {:>7} {:>9} {:>9}",name,metrics.links,metrics.maximum_degree,
			show(metrics.diameter.map(|d|d.to_string())),show(metrics.average_distance.map(|a|format!("{:.3}",a))));
	}
}

///What the terminal application was asked to do.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
pub enum Action
{
	Synthesize,
	Compare(TopologyChoice),
}

impl FromStr for Action
{
	type Err = Error;
	fn from_str(name:&str) -> Result<Action,Error>
	{
		match name
		{
			"synthesize" => Ok(Action::Synthesize),
			//The novel topology unless `--topology` says otherwise.
			"compare" => Ok(Action::Compare(TopologyChoice::Novel)),
			_ => Err(error!(bad_argument).with_message(format!("unknown action `{}`; expected synthesize or compare",name))),
		}
	}
}

pub fn get_version_number() -> &'static str
{
	match option_env!("CARGO_PKG_VERSION")
	{
		Some( version ) => version,
		_ => "?",
	}
}

///The options of the terminal application.
pub fn terminal_default_options() -> getopts::Options
{
	let mut opts = getopts::Options::new();
	//Options after the program belong to it.
	opts.parsing_style(getopts::ParsingStyle::StopAtFirstFree);
	opts.optopt("a","action","selected action: synthesize (default) or compare","ACTION");
	opts.optopt("t","topology","topology to simulate when comparing: novel, fully, ring, mesh or torus","NAME");
	opts.optopt("s","simulator","simulator command (default m2s)","COMMAND");
	opts.optopt("","timeout","seconds before a simulation is killed (default 3600)","SECONDS");
	opts.optopt("","max-instructions","instructions simulated per run (default 100000000)","N");
	opts.optopt("c","cores","number of cores, each with its switch (default 9)","N");
	opts.optopt("d","directory","directory for the configuration files and reports (default .)","PATH");
	opts.optopt("r","report","synthesize from an existing fully-connected network report instead of simulating","FILE");
	opts.optflag("v","verbose","show debug messages");
	opts.optflag("h","help","show this help");
	opts
}

fn parse_number<T:FromStr>(option_matches:&getopts::Matches, name:&str) -> Result<Option<T>,Error>
{
	match option_matches.opt_str(name)
	{
		None => Ok(None),
		Some(text) => text.parse::<T>().map(Some).map_err(|_|error!(bad_argument).with_message(format!("--{} expects a non-negative integer, got `{}`",name,text))),
	}
}

///Builds the options and the action from the parsed command line. The free arguments are `<maxlinks> <maxdegree> <program> [<args>...]`.
pub fn options_from_matches(option_matches:&getopts::Matches) -> Result<(SynthesisOptions,Action),Error>
{
	let free = &option_matches.free;
	if free.len()<3
	{
		return Err(error!(bad_argument).with_message(format!("expected <maxlinks> <maxdegree> <program> [<args>...], got {} arguments",free.len())));
	}
	let max_links = free[0].parse::<usize>().map_err(|_|error!(bad_argument).with_message(format!("maxlinks must be a non-negative integer, got `{}`",free[0])))?;
	let max_degree = free[1].parse::<usize>().map_err(|_|error!(bad_argument).with_message(format!("maxdegree must be a non-negative integer, got `{}`",free[1])))?;
	let mut options = SynthesisOptions::new(max_links,max_degree,&free[2]);
	options.arguments = free[3..].to_vec();
	if let Some(command) = option_matches.opt_str("simulator")
	{
		options.simulator = Simulator::from_command(&command)?;
	}
	if let Some(seconds) = parse_number::<u64>(option_matches,"timeout")?
	{
		options.simulator.timeout = std::time::Duration::from_secs(seconds);
	}
	if let Some(instructions) = parse_number::<u64>(option_matches,"max-instructions")?
	{
		options.simulator.max_instructions = instructions;
	}
	if let Some(cores) = parse_number::<usize>(option_matches,"cores")?
	{
		options.cores = cores;
	}
	if let Some(directory) = option_matches.opt_str("directory")
	{
		options.directory = PathBuf::from(directory);
	}
	options.report = option_matches.opt_str("report").map(PathBuf::from);
	let mut action = match option_matches.opt_str("action")
	{
		Some(name) => name.parse()?,
		None => Action::Synthesize,
	};
	if let Some(name) = option_matches.opt_str("topology")
	{
		match action
		{
			Action::Compare(_) => action = Action::Compare(name.parse()?),
			Action::Synthesize => warn!("--topology={} is only used when comparing; ignored",name),
		}
	}
	options.validate()?;
	Ok((options,action))
}

///Exit status when the synthesized topology misses `maxlinks` or `maxdegree`.
pub const EXIT_TARGET_NOT_MET: u8 = 4;
///Exit status when the simulator could not be run to completion.
pub const EXIT_SIMULATOR: u8 = 3;

///Runs the action on the options. A synthesis returns how close it got to the targets.
pub fn terminal_main(options:&SynthesisOptions, action:Action) -> Result<Option<ReductionOutcome>,Error>
{
	match action
	{
		Action::Synthesize => synthesis_main(options).map(|reduction|Some(reduction.outcome)),
		Action::Compare(topology) => comparison_main(options,topology).map(|_|None),
	}
}

///The process exit status for the result of `terminal_main`.
pub fn exit_status(result:&Result<Option<ReductionOutcome>,Error>) -> u8
{
	match result
	{
		Ok(Some(outcome)) if !outcome.is_feasible() => EXIT_TARGET_NOT_MET,
		Ok(_) => 0,
		Err(error) if error.is_external() => EXIT_SIMULATOR,
		Err(_) => 1,
	}
}
