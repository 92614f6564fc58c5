/*!

Configuration files for the Multi2Sim simulator (options `--ctx-config`, `--x86-config`, `--mem-config` and `--net-config`).

Every core has a private L1 attached to end node `nK`, which hangs from switch `swK`. The two L2 modules, each serving half the address space, are end nodes `n<cores>` and `n<cores+1>`, attached to switches 0,1 and 1,2. The switch-to-switch links are what changes between topologies; they are declared as

```ignore
[Network.net0.Link.sw3-sw7]
Source = sw3
Dest = sw7
Type = Bidirectional
```

*/

use std::fs::File;
use std::io::{BufWriter,Write};
use std::path::{Path,PathBuf};

use regex::Regex;

use crate::error::Error;

pub const CONTEXT_FILE: &str = "ctx-config.txt";
pub const CPU_FILE: &str = "cpu-config.txt";
pub const MEMORY_FILE: &str = "mem-config.txt";

///`<name>-net-config.txt`
pub fn network_config_name(topology_name:&str) -> String
{
	format!("{}-net-config.txt",topology_name)
}

///`<name>-net-report.txt`
pub fn network_report_name(topology_name:&str) -> String
{
	format!("{}-net-report.txt",topology_name)
}

pub fn write_context<W:Write>(out:&mut W, executable:&str, arguments:&[String]) -> Result<(),std::io::Error>
{
	writeln!(out,"[Context 0]")?;
	writeln!(out,"Exe = {}",executable)?;
	writeln!(out,"Args = {}",arguments.join(" "))?;
	Ok(())
}

///One thread per core.
pub fn write_cpu<W:Write>(out:&mut W, cores:usize) -> Result<(),std::io::Error>
{
	writeln!(out,"[ General ]")?;
	writeln!(out,"Cores = {}",cores)?;
	writeln!(out,"Threads = 1")?;
	Ok(())
}

pub fn write_memory<W:Write>(out:&mut W, cores:usize) -> Result<(),std::io::Error>
{
	writeln!(out,"[CacheGeometry geo-l1]\nSets = 128\nAssoc = 2\nBlockSize = 256\nLatency = 2\nPolicy = LRU\nPorts = 2")?;
	writeln!(out,"\n[CacheGeometry geo-l2]\nSets = 512\nAssoc = 4\nBlockSize = 256\nLatency = 20\nPolicy = LRU\nPorts = 4")?;
	for core in 0..cores
	{
		writeln!(out,"\n[Module mod-l1-{}]",core)?;
		writeln!(out,"Type = Cache\nGeometry = geo-l1\nLowNetwork = net0")?;
		writeln!(out,"LowNetworkNode = n{}",core)?;
		writeln!(out,"LowModules = mod-l2-0 mod-l2-1")?;
	}
	let bounds = ["0x00000000 0x7FFFFFFF","0x80000000 0xFFFFFFFF"];
	for (index,range) in bounds.iter().enumerate()
	{
		writeln!(out,"\n[Module mod-l2-{}]\nType = Cache\nGeometry = geo-l2\nHighNetwork = net0",index)?;
		writeln!(out,"HighNetworkNode = n{}",cores+index)?;
		writeln!(out,"LowNetwork = net-l2-mm\nLowModules = mod-mm")?;
		writeln!(out,"AddressRange = BOUNDS {}",range)?;
	}
	writeln!(out,"\n[Module mod-mm]\nType = MainMemory\nBlockSize = 256\nLatency = 100\nHighNetwork = net-l2-mm")?;
	writeln!(out,"\n[Network net-l2-mm]\nDefaultInputBufferSize = 1024\nDefaultOutputBufferSize = 1024\nDefaultBandwidth = 256")?;
	for core in 0..cores
	{
		writeln!(out,"\n[Entry core-{}]",core)?;
		writeln!(out,"Arch = x86\nCore = {}",core)?;
		writeln!(out,"Thread = 0\nDataModule = mod-l1-{}",core)?;
		writeln!(out,"InstModule = mod-l1-{}",core)?;
	}
	Ok(())
}

fn write_link<W:Write>(out:&mut W, source:&str, destination:&str) -> Result<(),std::io::Error>
{
	writeln!(out,"\n[Network.net0.Link.{}-{}]",source,destination)?;
	writeln!(out,"Source = {}\nDest = {}\nType = Bidirectional",source,destination)?;
	Ok(())
}

///The part of the network shared by all topologies: end nodes, switches and the links between them.
fn write_network_common<W:Write>(out:&mut W, cores:usize) -> Result<(),std::io::Error>
{
	writeln!(out,"[Network.net0]\nDefaultInputBufferSize = 1024\nDefaultOutputBufferSize = 1024\nDefaultBandwidth = 256")?;
	for core in 0..cores
	{
		writeln!(out,"\n[Network.net0.Node.n{}]\nType = EndNode",core)?;
		writeln!(out,"\n[Network.net0.Node.sw{}]\nType = Switch",core)?;
		write_link(out,&format!("sw{}",core),&format!("n{}",core))?;
	}
	for l2 in 0..2
	{
		writeln!(out,"\n[Network.net0.Node.n{}]\nType = EndNode",cores+l2)?;
	}
	for (switch,l2) in [(0,0),(1,0),(1,1),(2,1)]
	{
		write_link(out,&format!("sw{}",switch),&format!("n{}",cores+l2))?;
	}
	writeln!(out,"\n; above applies to all topologies")?;
	Ok(())
}

///Writes a whole network configuration with the given switch-to-switch links, each declared once and bidirectional.
pub fn write_network<W:Write>(out:&mut W, cores:usize, description:&str, links:&[(usize,usize)]) -> Result<(),std::io::Error>
{
	write_network_common(out,cores)?;
	writeln!(out,"; below describes a {} NoC",description)?;
	for &(a,b) in links
	{
		write_link(out,&format!("sw{}",a),&format!("sw{}",b))?;
	}
	Ok(())
}

///The switch-to-switch links declared in a network configuration, in order of appearance.
pub fn parse_link_declarations(text:&str) -> Vec<(usize,usize)>
{
	let header = Regex::new(r"^\[Network\.net0\.Link\.sw([0-9]+)-sw([0-9]+)\]").expect("invalid link pattern");
	let source = Regex::new(r"^Source = sw([0-9]+)$").expect("invalid link pattern");
	let destination = Regex::new(r"^Dest = sw([0-9]+)$").expect("invalid link pattern");
	let mut links = vec![];
	let mut current:(Option<usize>,Option<usize>) = (None,None);
	let mut inside = false;
	for line in text.lines().map(str::trim_end)
	{
		if line.starts_with('[')
		{
			inside = header.is_match(line);
			current = (None,None);
			continue;
		}
		if !inside
		{
			continue;
		}
		if let Some(captures) = source.captures(line)
		{
			current.0 = captures[1].parse().ok();
		}
		if let Some(captures) = destination.captures(line)
		{
			current.1 = captures[1].parse().ok();
		}
		if let (Some(a),Some(b)) = current
		{
			links.push((a,b));
			current = (None,None);
			inside = false;
		}
	}
	links
}

///Creates `path` and fills it with `write`.
pub fn generate_file<F>(path:&Path, write:F) -> Result<(),Error> where F:FnOnce(&mut BufWriter<File>)->Result<(),std::io::Error>
{
	let file = File::create(path).map_err(|err|error!(could_not_generate_file,path.to_path_buf(),err))?;
	let mut out = BufWriter::new(file);
	write(&mut out).and_then(|_|out.flush()).map_err(|err|error!(could_not_generate_file,path.to_path_buf(),err))
}

///Writes the context, cpu and memory configurations into `directory`.
pub fn generate_system_files(directory:&Path, cores:usize, executable:&str, arguments:&[String]) -> Result<(),Error>
{
	generate_file(&directory.join(CONTEXT_FILE),|out|write_context(out,executable,arguments))?;
	generate_file(&directory.join(CPU_FILE),|out|write_cpu(out,cores))?;
	generate_file(&directory.join(MEMORY_FILE),|out|write_memory(out,cores))?;
	Ok(())
}

///Writes `<name>-net-config.txt` into `directory`, returning its path.
pub fn generate_network_file(directory:&Path, name:&str, cores:usize, description:&str, links:&[(usize,usize)]) -> Result<PathBuf,Error>
{
	let path = directory.join(network_config_name(name));
	generate_file(&path,|out|write_network(out,cores,description,links))?;
	Ok(path)
}
