/*!

Parsing of the text reports of the simulator.

The reports are made of sections with a bracketed header followed by `Key = value` lines. The fields of interest are recognised by their key and by their fixed position after the header of their section, as the simulator always writes them in the same layout:

```ignore
[ Network.net0.General ]
Transfers = 10234                       (1 line after the header)
AverageMessageSize = 39.28              (2)
AverageLatency = 3.9113                 (3)

[ Network.net0.Link.link_<sw0.out_buf_1>_<sw1.in_buf_0> ]
Config.Bandwidth = 256
TransferredMessages = 120
TransferredBytes = 8960                 (3)

[ Network.net0.Node.n0 ]
Config.InputBufferSize = 1024
SentBytes = 47616                       (2)
```

Missing or malformed values are taken as zero. A partial report yields a partial result, never an error.

*/

use std::fs;
use std::path::Path;

use log::{debug,warn};
use regex::Regex;

use crate::error::Error;
use crate::topology::{Edge,TrafficGraph,Weight};

const GENERAL_HEADER: &str = r"^\[ Network\.net0\.General \]";
const LINK_HEADER: &str = r"^\[ Network\.net0\.Link\.link_<sw([0-9]+)\.out_buf_[0-9]+>_<sw([0-9]+)\.in_buf_[0-9]+> \]";
const NODE_HEADER: &str = r"^\[ Network\.net0\.Node\.n[0-9]+ \]";
const X86_HEADER: &str = r"^\[ x86 \]";
const ANY_HEADER: &str = r"^\[.*\]";

///The kind of section the parser is inside of.
#[derive(Debug,Clone,Copy,PartialEq,Eq)]
enum Section
{
	///Before any header.
	Preamble,
	General,
	Link{
		source: usize,
		destination: usize,
	},
	EndNode,
	X86,
	Other,
}

///Tracks the current section and how many lines have been read since its header.
struct SectionCursor
{
	patterns: Vec<(Regex,SectionPattern)>,
	any_header: Regex,
	section: Section,
	lines_since_header: usize,
}

#[derive(Debug,Clone,Copy)]
enum SectionPattern
{
	General,
	Link,
	EndNode,
	X86,
}

impl SectionCursor
{
	fn new(patterns:&[(&str,SectionPattern)]) -> SectionCursor
	{
		SectionCursor{
			patterns: patterns.iter().map(|&(text,kind)|(Regex::new(text).expect("invalid header pattern"),kind)).collect(),
			any_header: Regex::new(ANY_HEADER).expect("invalid header pattern"),
			section: Section::Preamble,
			lines_since_header: 0,
		}
	}
	///Advances over a line. Returns the section it belongs to and its offset from the header.
	fn advance(&mut self, line:&str) -> (Section,usize)
	{
		if self.any_header.is_match(line)
		{
			self.section = Section::Other;
			for (regex,kind) in self.patterns.iter()
			{
				if let Some(captures) = regex.captures(line)
				{
					self.section = match kind
					{
						SectionPattern::General => Section::General,
						SectionPattern::EndNode => Section::EndNode,
						SectionPattern::X86 => Section::X86,
						SectionPattern::Link => match (captures[1].parse(),captures[2].parse())
						{
							(Ok(source),Ok(destination)) => Section::Link{source,destination},
							_ =>
							{
								warn!("ignoring link with unreadable switch ids: {}",line);
								Section::Other
							},
						},
					};
					break;
				}
			}
			self.lines_since_header = 0;
		}
		else
		{
			self.lines_since_header += 1;
		}
		(self.section,self.lines_since_header)
	}
}

///The value of `line` if it is of the form `key = value`.
fn field<'a>(line:&'a str, key:&str) -> Option<&'a str>
{
	let rest = line.strip_prefix(key)?;
	let value = rest.trim_start().strip_prefix('=')?;
	Some(value.trim())
}

///Reads the leading number of a value, as in `3.9113` or `8960 [bytes]`. Zero when there is none.
fn leading_number(key:&str, value:&str) -> f64
{
	let end = value.find(|c:char|!(c.is_ascii_digit() || c=='.')).unwrap_or(value.len());
	match value[..end].parse::<f64>()
	{
		Ok(number) => number,
		Err(_) => {
			warn!("could not read a number from `{} = {}`; taking 0",key,value);
			0.0
		},
	}
}

fn leading_integer(key:&str, value:&str) -> u64
{
	let end = value.find(|c:char|!c.is_ascii_digit()).unwrap_or(value.len());
	match value[..end].parse::<u64>()
	{
		Ok(number) => number,
		Err(_) => {
			warn!("could not read an integer from `{} = {}`; taking 0",key,value);
			0
		},
	}
}

///Traffic observed on a network, as read from its report.
#[derive(Debug,Clone,Default,PartialEq)]
pub struct NetworkReport
{
	///Switch-to-switch traffic. Each link is reported once per direction; both are added.
	pub graph: TrafficGraph,
	///Number of packets sent.
	pub transfers: f64,
	///Average packet size in bytes.
	pub average_message_size: f64,
	///Average latency in cycles.
	pub average_latency: f64,
	///Bytes sent by all the end nodes.
	pub total_traffic: f64,
}

impl NetworkReport
{
	pub fn parse(text:&str) -> NetworkReport
	{
		let mut cursor = SectionCursor::new(&[
			(GENERAL_HEADER,SectionPattern::General),
			(LINK_HEADER,SectionPattern::Link),
			(NODE_HEADER,SectionPattern::EndNode),
		]);
		let mut report = NetworkReport::default();
		for line in text.lines()
		{
			let line = line.trim_end();
			match cursor.advance(line)
			{
				(Section::General,1) => if let Some(value) = field(line,"Transfers")
				{
					report.transfers = leading_number("Transfers",value);
				},
				(Section::General,2) => if let Some(value) = field(line,"AverageMessageSize")
				{
					report.average_message_size = leading_number("AverageMessageSize",value);
				},
				(Section::General,3) => if let Some(value) = field(line,"AverageLatency")
				{
					report.average_latency = leading_number("AverageLatency",value);
				},
				(Section::Link{source,destination},3) => if let Some(value) = field(line,"TransferredBytes")
				{
					let bytes:Weight = leading_integer("TransferredBytes",value);
					if source==destination
					{
						warn!("ignoring link from switch {} to itself",source);
					}
					else
					{
						report.graph.add_edge(Edge::new(source,destination),bytes);
					}
				},
				(Section::EndNode,2) => if let Some(value) = field(line,"SentBytes")
				{
					report.total_traffic += leading_number("SentBytes",value);
				},
				_ => (),
			}
		}
		debug!("network report with {} switches and {} links",report.graph.num_nodes(),report.graph.num_links());
		report
	}
	pub fn read(path:&Path) -> Result<NetworkReport,Error>
	{
		let text = fs::read_to_string(path).map_err(|err|error!(could_not_open_file,path.to_path_buf(),err).with_message("could not read network report.".to_string()))?;
		Ok(NetworkReport::parse(&text))
	}
}

///Figures of the whole run, read from the standard output of the simulator.
#[derive(Debug,Clone,Copy,Default,PartialEq)]
pub struct SimulationSummary
{
	pub committed_instructions: f64,
	///Simulated time in nanoseconds.
	pub simulated_nanoseconds: f64,
	pub cycles: f64,
}

impl SimulationSummary
{
	///Fields of the `[ x86 ]` section: instructions at line 7, time at 12 and cycles at 14.
	pub fn parse(text:&str) -> SimulationSummary
	{
		let mut cursor = SectionCursor::new(&[(X86_HEADER,SectionPattern::X86)]);
		let mut summary = SimulationSummary::default();
		for line in text.lines()
		{
			let line = line.trim_end();
			match cursor.advance(line)
			{
				(Section::X86,7) => if let Some(value) = field(line,"CommittedInstructions")
				{
					summary.committed_instructions = leading_number("CommittedInstructions",value);
				},
				(Section::X86,12) => if let Some(value) = field(line,"SimTime")
				{
					summary.simulated_nanoseconds = leading_number("SimTime",value);
				},
				(Section::X86,14) => if let Some(value) = field(line,"Cycles")
				{
					summary.cycles = leading_number("Cycles",value);
				},
				_ => (),
			}
		}
		summary
	}
}
