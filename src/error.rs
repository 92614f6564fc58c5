/*!

Errors of the crate.

Build them with the `error!` macro, which records where they were raised:
```ignore
return Err( error!(bad_argument).with_message(format!("maxlinks must be at least 9, got {}",max_links)) );
```

Algorithmic conditions, such as a node degree that cannot be lowered, are not errors. They are reported through [`ReductionOutcome`](crate::reduction::ReductionOutcome).
*/

use std::fmt::{self,Display,Formatter};
use std::path::PathBuf;

///Where an error has been created.
#[derive(Debug,Clone,PartialEq,Eq)]
pub struct SourceLocation
{
	pub file: &'static str,
	pub line: u32,
	pub column: u32,
}

impl Display for SourceLocation
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		write!(formatter,"{}:{}:{}",self.file,self.line,self.column)
	}
}

#[macro_export]
macro_rules! source_location{
	() => {
		$crate::error::SourceLocation{ file:file!(), line:line!(), column:column!() }
	};
}

///`error!(kind,args...)` calls the constructor `Error::kind(source_location,args...)`.
#[macro_export]
macro_rules! error{
	($kind:ident) => {
		$crate::error::Error::$kind( $crate::source_location!() )
	};
	($kind:ident, $($args:expr),* ) => {
		$crate::error::Error::$kind( $crate::source_location!(), $($args),* )
	};
}

#[derive(Debug)]
pub struct Error
{
	pub source_location: SourceLocation,
	pub kind: ErrorKind,
	pub message: Option<String>,
}

#[derive(Debug)]
pub enum ErrorKind
{
	CouldNotOpenFile{
		filepath: PathBuf,
		error: std::io::Error,
	},
	CouldNotGenerateFile{
		filepath: PathBuf,
		error: std::io::Error,
	},
	///Some configuration value is out of its range or could not be understood.
	BadArgument,
	///The traffic graph cannot be reduced keeping connectivity because it is not connected to begin with.
	DisconnectedTraffic,
	CouldNotLaunchSimulator{
		program: String,
		error: std::io::Error,
	},
	///The simulator exited unsuccessfully. `code` is `None` when killed by a signal.
	SimulatorFailed{
		code: Option<i32>,
	},
	SimulatorTimeout{
		seconds: u64,
	},
}

impl Error
{
	pub fn new(source_location:SourceLocation, kind:ErrorKind) -> Error
	{
		Error{
			source_location,
			kind,
			message: None,
		}
	}
	pub fn with_message(mut self, message:String) -> Error
	{
		self.message = Some(message);
		self
	}
	pub fn could_not_open_file(source_location:SourceLocation, filepath:PathBuf, error:std::io::Error) -> Error
	{
		Error::new(source_location,ErrorKind::CouldNotOpenFile{filepath,error})
	}
	pub fn could_not_generate_file(source_location:SourceLocation, filepath:PathBuf, error:std::io::Error) -> Error
	{
		Error::new(source_location,ErrorKind::CouldNotGenerateFile{filepath,error})
	}
	pub fn bad_argument(source_location:SourceLocation) -> Error
	{
		Error::new(source_location,ErrorKind::BadArgument)
	}
	pub fn disconnected_traffic(source_location:SourceLocation) -> Error
	{
		Error::new(source_location,ErrorKind::DisconnectedTraffic)
	}
	pub fn could_not_launch_simulator(source_location:SourceLocation, program:String, error:std::io::Error) -> Error
	{
		Error::new(source_location,ErrorKind::CouldNotLaunchSimulator{program,error})
	}
	pub fn simulator_failed(source_location:SourceLocation, code:Option<i32>) -> Error
	{
		Error::new(source_location,ErrorKind::SimulatorFailed{code})
	}
	pub fn simulator_timeout(source_location:SourceLocation, seconds:u64) -> Error
	{
		Error::new(source_location,ErrorKind::SimulatorTimeout{seconds})
	}
	///Whether the error comes from the external simulator rather than from our own inputs.
	pub fn is_external(&self) -> bool
	{
		matches!(self.kind, ErrorKind::CouldNotLaunchSimulator{..} | ErrorKind::SimulatorFailed{..} | ErrorKind::SimulatorTimeout{..})
	}
}

impl Display for ErrorKind
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		use ErrorKind::*;
		match self
		{
			CouldNotOpenFile{filepath,error} => write!(formatter,"could not open file {}: {}",filepath.display(),error),
			CouldNotGenerateFile{filepath,error} => write!(formatter,"could not generate file {}: {}",filepath.display(),error),
			BadArgument => write!(formatter,"bad argument"),
			DisconnectedTraffic => write!(formatter,"the traffic graph is empty or not connected"),
			CouldNotLaunchSimulator{program,error} => write!(formatter,"could not launch simulator {}: {}",program,error),
			SimulatorFailed{code:Some(code)} => write!(formatter,"the simulator exited with code {}",code),
			SimulatorFailed{code:None} => write!(formatter,"the simulator was terminated by a signal"),
			SimulatorTimeout{seconds} => write!(formatter,"the simulator did not finish within {} seconds",seconds),
		}
	}
}

impl Display for Error
{
	fn fmt(&self, formatter:&mut Formatter) -> fmt::Result
	{
		write!(formatter,"{} (at {})",self.kind,self.source_location)?;
		if let Some(ref message) = self.message
		{
			write!(formatter,": {}",message)?;
		}
		Ok(())
	}
}

impl std::error::Error for Error
{
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)>
	{
		match self.kind
		{
			ErrorKind::CouldNotOpenFile{ref error,..}
			| ErrorKind::CouldNotGenerateFile{ref error,..}
			| ErrorKind::CouldNotLaunchSimulator{ref error,..} => Some(error),
			_ => None,
		}
	}
}
