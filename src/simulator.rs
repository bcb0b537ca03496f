use std::io::{self, Write};

use log::info;

use crate::diagnostics::{FreePageMap, PageTableDump};
use crate::io::Command;
use crate::memory::PhysicalMemory;
use crate::process::{create_process, kill_process};
use crate::translation::{load, store, VirtualAddress};

/// One simulated machine: a physical memory and the commands run against it.
pub struct Simulator {
    pm: PhysicalMemory,
}

impl Simulator {
    pub fn new() -> Self {
        Simulator {
            pm: PhysicalMemory::new(),
        }
    }

    pub fn memory(&self) -> &PhysicalMemory {
        &self.pm
    }

    /// Run a single command, writing its user-visible output to `out`.
    ///
    /// Running out of memory is reported on `out` and does not stop the
    /// simulation; only I/O errors are returned.
    pub fn execute<W: Write>(&mut self, command: &Command, out: &mut W) -> io::Result<()> {
        match *command {
            Command::NewProcess { proc_num, page_count } => {
                if let Err(err) = create_process(&mut self.pm, proc_num, page_count) {
                    info!("np {proc_num} {page_count} stopped early");
                    writeln!(out, "{err}")?;
                }
            }
            Command::PrintFreeMap => write!(out, "{}", FreePageMap(&self.pm))?,
            Command::PrintPageTable { proc_num } => write!(
                out,
                "{}",
                PageTableDump {
                    pm: &self.pm,
                    proc_num
                }
            )?,
            Command::KillProcess { proc_num } => kill_process(&mut self.pm, proc_num),
            Command::StoreByte { proc_num, va, value } => {
                let pa = store(&mut self.pm, proc_num, VirtualAddress::from_raw(va), value);
                writeln!(out, "Store proc {proc_num}: {va} => {pa}, value={value}")?;
            }
            Command::LoadByte { proc_num, va } => {
                let (pa, value) = load(&self.pm, proc_num, VirtualAddress::from_raw(va));
                writeln!(out, "Load proc {proc_num}: {va} => {pa}, value={value}")?;
            }
        }
        Ok(())
    }

    pub fn run<W: Write>(&mut self, commands: &[Command], out: &mut W) -> io::Result<()> {
        for command in commands {
            self.execute(command, out)?;
        }
        Ok(())
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
