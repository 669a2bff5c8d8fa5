//! Execution engine for the AGC.
//!
//! Dispatches one instruction at a time against either the base table or,
//! for exactly one dispatch after EXTEND, the extended table. Every handler
//! validates the addresses it touches before it changes anything, so a failed
//! dispatch leaves the machine exactly as it found it.

use crate::word::{arith, Word, SIGN_BIT};
use crate::cpu::{Memory, Registers, InterruptFlags};
use crate::cpu::decode::{self, Instruction, Opcode, OperandKind, Table, DecodeError};
use crate::cpu::memory::MemoryError;
use crate::io::Peripherals;
use log::{debug, trace, warn};
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Dispatch mode of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Instructions resolve through the base table.
    Normal,
    /// The next instruction resolves through the extended table.
    Extended,
}

impl Mode {
    fn table(self) -> Table {
        match self {
            Mode::Normal => Table::Base,
            Mode::Extended => Table::Extended,
        }
    }
}

/// The whole simulated machine.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agc {
    /// Central registers, EXTEND state and cycle counter.
    pub regs: Registers,
    /// Fixed and erasable memory.
    pub mem: Memory,
    /// Interrupt enable/pending flags.
    pub interrupts: InterruptFlags,
    /// DSKY queue and interface counters.
    pub io: Peripherals,
}

impl Agc {
    /// Create a machine with zeroed memory and registers.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            interrupts: InterruptFlags::new(),
            io: Peripherals::new(),
        }
    }

    /// Return the machine to its construction-time state.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.interrupts.reset();
        self.io.reset();
        debug!("machine reset");
    }

    /// Current dispatch mode.
    pub fn mode(&self) -> Mode {
        if self.regs.extended_mode {
            Mode::Extended
        } else {
            Mode::Normal
        }
    }

    /// Machine cycles consumed since construction or the last reset.
    pub fn cycles(&self) -> u64 {
        self.regs.cycles()
    }

    /// Execute an instruction given as a mnemonic and optional operand.
    ///
    /// An empty mnemonic is a no-op and costs nothing. A mnemonic missing
    /// from the active table fails with [`CpuError::UnknownInstruction`].
    pub fn execute(&mut self, opcode: &str, operand: Option<u16>) -> Result<(), CpuError> {
        if opcode.is_empty() {
            return Ok(());
        }

        let table = self.mode().table();
        let op = match Opcode::lookup(opcode, table) {
            Some(op) => op,
            None => {
                warn!("unknown instruction {} in {:?} mode", opcode, self.mode());
                return Err(CpuError::UnknownInstruction(opcode.to_string()));
            }
        };

        self.dispatch(Instruction { opcode: op, operand })
    }

    /// Execute one line of the form `"MNEMONIC [OPERAND]"`.
    ///
    /// A blank line is a no-op.
    pub fn execute_line(&mut self, line: &str) -> Result<(), CpuError> {
        let mut parts = line.split_whitespace();
        let mnemonic = match parts.next() {
            Some(m) => m,
            None => return Ok(()),
        };
        let operand = parts.next().map(decode::parse_operand).transpose()?;
        if let Some(extra) = parts.next() {
            return Err(DecodeError::TrailingInput(extra.to_string()).into());
        }
        self.execute(mnemonic, operand)
    }

    /// Execute an already-resolved instruction.
    ///
    /// In extended mode only MP, DV and SU are accepted. Extended mode is
    /// cleared after a successful extended dispatch; a failed one leaves it
    /// set, so the following instruction is also looked up in the extended
    /// table.
    pub fn dispatch(&mut self, instr: Instruction) -> Result<(), CpuError> {
        let mode = self.mode();
        let op = instr.opcode;

        if !op.in_table(mode.table()) {
            warn!("unknown instruction {} in {:?} mode", op, mode);
            return Err(CpuError::UnknownInstruction(op.mnemonic().to_string()));
        }

        let operand = match (op.operand(), instr.operand) {
            (OperandKind::Required, None) => return Err(CpuError::MissingOperand(op)),
            (OperandKind::None, Some(_)) => return Err(CpuError::UnexpectedOperand(op)),
            (_, k) => k,
        };

        trace!("{:05o}: {} ({:?}, {} cycles)", self.regs.pc.raw(), instr, mode, op.cycles());
        self.apply(op, operand)?;

        if mode == Mode::Extended {
            self.regs.leave_extended();
            debug!("left extended mode after {}", op);
        }
        self.regs.charge(op.cycles());

        Ok(())
    }

    /// Run a handler. Operand presence has already been checked.
    fn apply(&mut self, op: Opcode, operand: Option<u16>) -> Result<(), CpuError> {
        let k = operand.unwrap_or(0);
        let addr = k as usize;

        match op {
            // ==================== Control ====================

            Opcode::Tc | Opcode::Index => {
                self.regs.jump(Word::new(k));
            }

            Opcode::Ccs => {
                let value = self.mem.read(addr)?;
                if value.is_zero() {
                    self.regs.skip();
                } else if !value.is_negative() {
                    self.regs.a = arith::complement(self.regs.a);
                } else {
                    self.regs.a = Word::new(self.regs.a.raw() & !SIGN_BIT);
                }
            }

            Opcode::Bzf => {
                let a = self.regs.a;
                if a.is_zero() || !a.is_negative() {
                    self.regs.jump(Word::new(k));
                }
            }

            Opcode::Bzm => {
                let a = self.regs.a;
                if a.is_negative() && !a.is_zero() {
                    self.regs.jump(Word::new(k));
                }
            }

            Opcode::Extend => {
                self.regs.enter_extended(operand);
                debug!("entered extended mode");
            }

            // ==================== Single-word transfer ====================

            Opcode::Xch => {
                let value = self.mem.read(addr)?;
                self.mem.write(addr, self.regs.a)?;
                self.regs.a = value;
            }

            Opcode::Lxch => {
                let value = self.mem.read(addr)?;
                self.mem.write(addr, self.regs.l)?;
                self.regs.l = value;
            }

            Opcode::Qxch => {
                let value = self.mem.read(addr)?;
                self.mem.write(addr, self.regs.q)?;
                self.regs.q = value;
            }

            Opcode::Ca => {
                self.regs.a = self.mem.read(addr)?;
            }

            Opcode::Cs => {
                self.regs.a = arith::complement(self.mem.read(addr)?);
            }

            Opcode::Ts => {
                self.mem.write(addr, self.regs.a)?;
                self.regs.a = Word::ZERO;
            }

            // ==================== Arithmetic ====================

            Opcode::Ad => {
                self.regs.a = arith::add(self.regs.a, self.mem.read(addr)?);
            }

            Opcode::Su => {
                self.regs.a = arith::subtract(self.regs.a, self.mem.read(addr)?);
            }

            Opcode::Msk | Opcode::Mask => {
                self.regs.a = Word::new(self.regs.a.raw() & k);
            }

            Opcode::Mp => {
                let product = self.regs.a.raw() as u32 * self.mem.read(addr)?.raw() as u32;
                self.regs.l = arith::mask(product >> 15);
                self.regs.a = arith::mask(product);
            }

            Opcode::Dv => {
                let divisor = self.mem.read(addr)?;
                if divisor.raw() == 0 {
                    warn!("DV by zero at {:05o}; A and L cleared, interrupt raised", addr);
                    self.regs.a = Word::ZERO;
                    self.regs.l = Word::ZERO;
                    self.interrupts.raise();
                } else {
                    let dividend = ((self.regs.l.raw() as u32) << 15) | self.regs.a.raw() as u32;
                    let divisor = divisor.raw() as u32;
                    self.regs.a = arith::mask(dividend / divisor);
                    self.regs.l = arith::mask(dividend % divisor);
                }
            }

            // ==================== Double-word ====================

            Opcode::Dca => {
                let (low, high) = self.mem.read_double(addr)?;
                self.regs.a = low;
                self.regs.l = high;
            }

            Opcode::Dcs => {
                let (low, high) = self.mem.read_double(addr)?;
                self.regs.a = arith::complement(low);
                self.regs.l = arith::complement(high);
            }

            Opcode::Dad => {
                let (m0, m1) = self.mem.read_double(addr)?;
                let (high, low) = arith::double_add(self.regs.l, self.regs.a, m1, m0);
                self.regs.a = low;
                self.regs.l = high;
            }

            Opcode::Dsu => {
                let (m0, m1) = self.mem.read_double(addr)?;
                let (high, low) = arith::double_subtract(self.regs.l, self.regs.a, m1, m0);
                self.regs.a = low;
                self.regs.l = high;
            }

            Opcode::Das => {
                let (m0, m1) = self.mem.read_double(addr)?;
                let (high, low) = arith::double_add(self.regs.l, self.regs.a, m1, m0);
                self.mem.write_double(addr, low, high)?;
            }

            Opcode::Dxch => {
                let (m0, m1) = self.mem.read_double(addr)?;
                self.mem.write_double(addr, self.regs.a, self.regs.l)?;
                self.regs.a = m0;
                self.regs.l = m1;
            }

            // ==================== Counters ====================

            Opcode::Incr => {
                let value = self.mem.read(addr)?;
                self.mem.write(addr, arith::add(value, Word::ONE))?;
            }

            Opcode::Dim => {
                let value = self.mem.read(addr)?;
                self.mem.write(addr, arith::subtract(value, Word::ONE))?;
            }

            Opcode::Pinc => {
                let value = self.mem.read(addr)?;
                if !value.is_negative() {
                    self.mem.write(addr, arith::add(value, Word::ONE))?;
                }
            }

            Opcode::Minc => {
                let value = self.mem.read(addr)?;
                if value.is_negative() {
                    self.mem.write(addr, arith::add(value, Word::ONE))?;
                }
            }

            Opcode::Aug | Opcode::Noop => {}

            // ==================== Editing ====================

            Opcode::Cyr => {
                let value = self.mem.read(addr)?;
                self.mem.write(addr, arith::cycle_right(value))?;
            }

            Opcode::Sr => {
                let value = self.mem.read(addr)?;
                self.mem.write(addr, arith::shift_right(value))?;
            }

            Opcode::Sl => {
                let value = self.mem.read(addr)?;
                self.mem.write(addr, arith::shift_left(value))?;
            }

            // ==================== Interrupts ====================

            Opcode::Relint => self.interrupts.enabled = true,
            Opcode::Inhint => self.interrupts.enabled = false,
            Opcode::Edrupt | Opcode::Int => self.interrupts.raise(),
            Opcode::Resume => self.interrupts.pending = false,

            // ==================== Channels ====================

            Opcode::Read => {
                self.regs.a = self.io.counters.read(addr).unwrap_or(Word::ZERO);
            }

            Opcode::Write => {
                self.io.counters.write(addr, self.regs.a);
            }

            Opcode::Rand => {
                self.regs.a = self.io.counters.read(addr).unwrap_or(Word::ZERO);
                self.io.counters.write(addr, Word::ZERO);
            }
        }

        Ok(())
    }

    // ==================== Peripherals ====================

    /// Queue a word for the DSKY.
    pub fn dsky_input(&mut self, value: Word) {
        self.io.dsky.input(value);
    }

    /// Take the oldest queued DSKY word, if any.
    pub fn dsky_output(&mut self) -> Option<Word> {
        self.io.dsky.output()
    }

    /// Read interface counter `index`; `None` when out of range.
    pub fn interface_counter_read(&self, index: usize) -> Option<Word> {
        self.io.counters.read(index)
    }

    /// Write interface counter `index`; silently ignored when out of range.
    pub fn interface_counter_write(&mut self, index: usize, value: Word) {
        self.io.counters.write(index, value);
    }

    /// Capture the observable state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            a: self.regs.a,
            l: self.regs.l,
            q: self.regs.q,
            pc: self.regs.pc,
            mode: self.mode(),
            extended_address: self.regs.extended_address,
            cycles: self.cycles(),
            interrupts: self.interrupts.clone(),
            erasable: self.mem.dump_nonzero(),
            dsky: self.io.dsky.iter().copied().collect(),
            counters: self.io.counters.as_slice().to_vec(),
        }
    }
}

impl Default for Agc {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Agc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agc")
            .field("mode", &self.mode())
            .field("cycles", &self.cycles())
            .field("regs", &self.regs)
            .field("interrupts", &self.interrupts)
            .finish()
    }
}

/// Observable machine state, suitable for JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub a: Word,
    pub l: Word,
    pub q: Word,
    pub pc: Word,
    pub mode: Mode,
    pub extended_address: Option<u16>,
    pub cycles: u64,
    pub interrupts: InterruptFlags,
    /// Non-zero erasable cells as `(address, value)`.
    pub erasable: Vec<(usize, Word)>,
    pub dsky: Vec<Word>,
    pub counters: Vec<Word>,
}

/// Errors that can occur during instruction dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("unknown instruction: {0}")]
    UnknownInstruction(String),

    #[error("{0} requires an operand")]
    MissingOperand(Opcode),

    #[error("{0} takes no operand")]
    UnexpectedOperand(Opcode),

    #[error("memory error: {0}")]
    MemoryError(#[from] MemoryError),

    #[error("decode error: {0}")]
    DecodeError(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::memory::ERASABLE_SIZE;

    fn w(v: u16) -> Word {
        Word::new(v)
    }

    fn machine_with(cells: &[(usize, u16)]) -> Agc {
        let mut agc = Agc::new();
        for &(addr, value) in cells {
            agc.mem.write(addr, w(value)).unwrap();
        }
        agc
    }

    #[test]
    fn test_incr_ad_su_sequence() {
        let mut agc = machine_with(&[(0, 1)]);

        agc.execute("INCR", Some(0)).unwrap();
        assert_eq!(agc.mem.read(0).unwrap(), w(2));

        agc.execute("AD", Some(0)).unwrap();
        assert_eq!(agc.regs.a, w(2));

        agc.execute("SU", Some(0)).unwrap();
        assert_eq!(agc.regs.a, Word::ZERO);
        assert_eq!(agc.cycles(), 6);
    }

    #[test]
    fn test_empty_instruction_is_free() {
        let mut agc = Agc::new();
        agc.execute("", None).unwrap();
        agc.execute_line("   ").unwrap();
        assert_eq!(agc, Agc::new());
    }

    #[test]
    fn test_tc_and_index() {
        let mut agc = Agc::new();
        agc.execute("TC", Some(0o100)).unwrap();
        assert_eq!(agc.regs.pc, w(0o100));
        agc.execute("INDEX", Some(0o200)).unwrap();
        assert_eq!(agc.regs.pc, w(0o200));
        assert_eq!(agc.cycles(), 2);
    }

    #[test]
    fn test_ccs_branches() {
        // Zero operand: PC advances.
        let mut agc = machine_with(&[(1, 0x7FFF)]);
        agc.regs.pc = w(10);
        agc.execute("CCS", Some(1)).unwrap();
        assert_eq!(agc.regs.pc, w(11));

        // Positive operand: A complemented.
        let mut agc = machine_with(&[(1, 5)]);
        agc.regs.a = w(3);
        agc.execute("CCS", Some(1)).unwrap();
        assert_eq!(agc.regs.a, w(0x7FFC));

        // Negative operand: sign bit of A cleared.
        let mut agc = machine_with(&[(1, 0x7FF0)]);
        agc.regs.a = w(0x4003);
        agc.execute("CCS", Some(1)).unwrap();
        assert_eq!(agc.regs.a, w(3));
        assert_eq!(agc.cycles(), 2);
    }

    #[test]
    fn test_transfers() {
        let mut agc = machine_with(&[(4, 9)]);
        agc.regs.a = w(7);
        agc.execute("XCH", Some(4)).unwrap();
        assert_eq!(agc.regs.a, w(9));
        assert_eq!(agc.mem.read(4).unwrap(), w(7));

        agc.execute("CS", Some(4)).unwrap();
        assert_eq!(agc.regs.a, arith::complement(w(7)));

        agc.execute("CA", Some(4)).unwrap();
        assert_eq!(agc.regs.a, w(7));

        agc.execute("TS", Some(5)).unwrap();
        assert_eq!(agc.mem.read(5).unwrap(), w(7));
        assert_eq!(agc.regs.a, Word::ZERO);
    }

    #[test]
    fn test_lxch_qxch() {
        let mut agc = machine_with(&[(2, 11), (3, 12)]);
        agc.regs.l = w(1);
        agc.regs.q = w(2);
        agc.execute("LXCH", Some(2)).unwrap();
        agc.execute("QXCH", Some(3)).unwrap();
        assert_eq!((agc.regs.l, agc.regs.q), (w(11), w(12)));
        assert_eq!(agc.mem.read(2).unwrap(), w(1));
        assert_eq!(agc.mem.read(3).unwrap(), w(2));
    }

    #[test]
    fn test_msk() {
        let mut agc = Agc::new();
        agc.regs.a = w(0o7777);
        agc.execute("MSK", Some(0xFF0F)).unwrap();
        assert_eq!(agc.regs.a, w(0o7777 & 0x7F0F));
        assert_eq!(agc.cycles(), 1);
    }

    #[test]
    fn test_mask_matches_msk() {
        let mut by_msk = Agc::new();
        let mut by_mask = Agc::new();
        by_msk.regs.a = w(0o52525);
        by_mask.regs.a = w(0o52525);
        by_msk.execute("MSK", Some(0o7070)).unwrap();
        by_mask.execute("MASK", Some(0o7070)).unwrap();
        assert_eq!(by_mask.regs.a, w(0o52525 & 0o7070));
        assert_eq!(by_mask.regs, by_msk.regs);
        assert_eq!(by_mask.execute("MASK", None), Err(CpuError::MissingOperand(Opcode::Mask)));
    }

    #[test]
    fn test_mp_splits_product() {
        let mut agc = machine_with(&[(6, 0x4000)]);
        agc.regs.a = w(6);
        agc.execute("MP", Some(6)).unwrap();
        // 6 * 0x4000 = 0x18000
        assert_eq!(agc.regs.l, w(3));
        assert_eq!(agc.regs.a, Word::ZERO);
        assert_eq!(agc.cycles(), 6);
    }

    #[test]
    fn test_dv_quotient_and_remainder() {
        let mut agc = machine_with(&[(8, 7)]);
        agc.regs.l = w(0);
        agc.regs.a = w(100);
        agc.execute("DV", Some(8)).unwrap();
        assert_eq!(agc.regs.a, w(14));
        assert_eq!(agc.regs.l, w(2));

        // Dividend spans both registers.
        let mut agc = machine_with(&[(8, 2)]);
        agc.regs.l = w(1);
        agc.regs.a = w(0);
        agc.execute("DV", Some(8)).unwrap();
        assert_eq!(agc.regs.a, w(0x4000));
        assert_eq!(agc.regs.l, Word::ZERO);
    }

    #[test]
    fn test_dv_by_zero_is_silent() {
        let mut agc = Agc::new();
        agc.regs.a = w(5);
        agc.regs.l = w(5);
        agc.execute("DV", Some(9)).unwrap();
        assert_eq!(agc.regs.a, Word::ZERO);
        assert_eq!(agc.regs.l, Word::ZERO);
        assert!(agc.interrupts.pending);
        assert_eq!(agc.cycles(), 6);
    }

    #[test]
    fn test_double_loads_wrap() {
        let last = ERASABLE_SIZE - 1;
        let mut agc = machine_with(&[(last, 0o123), (0, 0o456)]);
        agc.execute("DCA", Some(last as u16)).unwrap();
        assert_eq!((agc.regs.a, agc.regs.l), (w(0o123), w(0o456)));

        agc.execute("DCS", Some(last as u16)).unwrap();
        assert_eq!(agc.regs.a, arith::complement(w(0o123)));
        assert_eq!(agc.regs.l, arith::complement(w(0o456)));
        assert_eq!(agc.cycles(), 8);
    }

    #[test]
    fn test_dad_carries_into_high_word() {
        let mut agc = machine_with(&[(10, 0x4000), (11, 2)]);
        agc.regs.a = w(0x4000);
        agc.regs.l = w(1);
        agc.execute("DAD", Some(10)).unwrap();
        assert_eq!(agc.regs.a, w(1));
        assert_eq!(agc.regs.l, w(4));
    }

    #[test]
    fn test_dsu_borrows_from_high_word() {
        let mut agc = machine_with(&[(10, 3), (11, 2)]);
        agc.regs.a = w(1);
        agc.regs.l = w(5);
        agc.execute("DSU", Some(10)).unwrap();
        assert_eq!(agc.regs.a, arith::subtract(w(1), w(3)));
        assert_eq!(agc.regs.l, w(2));
    }

    #[test]
    fn test_das_stores_sum() {
        let mut agc = machine_with(&[(20, 5), (21, 6)]);
        agc.regs.a = w(1);
        agc.regs.l = w(2);
        agc.execute("DAS", Some(20)).unwrap();
        assert_eq!(agc.mem.read(20).unwrap(), w(6));
        assert_eq!(agc.mem.read(21).unwrap(), w(8));
        assert_eq!((agc.regs.a, agc.regs.l), (w(1), w(2)));
    }

    #[test]
    fn test_dxch_swaps_pair() {
        let last = (ERASABLE_SIZE - 1) as u16;
        let mut agc = machine_with(&[(last as usize, 7), (0, 8)]);
        agc.regs.a = w(1);
        agc.regs.l = w(2);
        agc.execute("DXCH", Some(last)).unwrap();
        assert_eq!((agc.regs.a, agc.regs.l), (w(7), w(8)));
        assert_eq!(agc.mem.read(last as usize).unwrap(), w(1));
        assert_eq!(agc.mem.read(0).unwrap(), w(2));
        assert_eq!(agc.cycles(), 4);
    }

    #[test]
    fn test_counters_and_increments() {
        let mut agc = machine_with(&[(1, 5), (2, 0x7FFA), (3, 0)]);
        agc.execute("DIM", Some(1)).unwrap();
        assert_eq!(agc.mem.read(1).unwrap(), w(4));

        agc.execute("PINC", Some(1)).unwrap();
        assert_eq!(agc.mem.read(1).unwrap(), w(5));
        agc.execute("PINC", Some(2)).unwrap();
        assert_eq!(agc.mem.read(2).unwrap(), w(0x7FFA));

        agc.execute("MINC", Some(2)).unwrap();
        assert_eq!(agc.mem.read(2).unwrap(), w(0x7FFB));
        agc.execute("MINC", Some(1)).unwrap();
        assert_eq!(agc.mem.read(1).unwrap(), w(5));

        // +0 diminished is -1.
        agc.execute("DIM", Some(3)).unwrap();
        assert_eq!(agc.mem.read(3).unwrap(), w(0x7FFE));
    }

    #[test]
    fn test_branches() {
        let mut agc = Agc::new();
        agc.regs.a = w(0x7FFF);
        agc.execute("BZF", Some(0o40)).unwrap();
        assert_eq!(agc.regs.pc, w(0o40));

        agc.regs.a = w(0x4001);
        agc.execute("BZF", Some(0o50)).unwrap();
        assert_eq!(agc.regs.pc, w(0o40));
        agc.execute("BZM", Some(0o60)).unwrap();
        assert_eq!(agc.regs.pc, w(0o60));

        agc.regs.a = w(0x7FFF);
        agc.execute("BZM", Some(0o70)).unwrap();
        assert_eq!(agc.regs.pc, w(0o60));
        assert_eq!(agc.cycles(), 8);
    }

    #[test]
    fn test_interrupt_instructions() {
        let mut agc = Agc::new();
        agc.execute("INHINT", None).unwrap();
        assert!(!agc.interrupts.enabled);
        agc.execute("RELINT", None).unwrap();
        assert!(agc.interrupts.enabled);
        agc.execute("EDRUPT", None).unwrap();
        assert!(agc.interrupts.pending);
        agc.execute("RESUME", None).unwrap();
        assert!(!agc.interrupts.pending);
        agc.execute("INT", None).unwrap();
        assert!(agc.interrupts.pending);
        assert_eq!(agc.cycles(), 5);
    }

    #[test]
    fn test_editing() {
        let mut agc = machine_with(&[(1, 1), (2, 0x4001), (3, 0x4001)]);
        agc.execute("CYR", Some(1)).unwrap();
        agc.execute("SR", Some(2)).unwrap();
        agc.execute("SL", Some(3)).unwrap();
        assert_eq!(agc.mem.read(1).unwrap(), w(0x4000));
        assert_eq!(agc.mem.read(2).unwrap(), w(0x2000));
        assert_eq!(agc.mem.read(3).unwrap(), w(2));
    }

    #[test]
    fn test_aug_costs_nothing() {
        let mut agc = Agc::new();
        agc.execute("AUG", Some(3)).unwrap();
        agc.execute("AUG", None).unwrap();
        assert_eq!(agc, Agc::new());
    }

    #[test]
    fn test_channel_instructions() {
        let mut agc = Agc::new();
        agc.regs.a = w(0o1234);
        agc.execute("WRITE", Some(4)).unwrap();
        assert_eq!(agc.interface_counter_read(4), Some(w(0o1234)));

        agc.regs.a = Word::ZERO;
        agc.execute("READ", Some(4)).unwrap();
        assert_eq!(agc.regs.a, w(0o1234));

        agc.regs.a = Word::ZERO;
        agc.execute("RAND", Some(4)).unwrap();
        assert_eq!(agc.regs.a, w(0o1234));
        assert_eq!(agc.interface_counter_read(4), Some(Word::ZERO));

        agc.regs.a = w(9);
        agc.execute("READ", Some(99)).unwrap();
        assert_eq!(agc.regs.a, Word::ZERO);
    }

    #[test]
    fn test_extend_routes_one_instruction() {
        let mut agc = machine_with(&[(1, 3)]);
        agc.regs.a = w(4);
        agc.execute("EXTEND", Some(0o17)).unwrap();
        assert_eq!(agc.mode(), Mode::Extended);
        assert_eq!(agc.regs.extended_address, Some(0o17));

        agc.execute("MP", Some(1)).unwrap();
        assert_eq!(agc.regs.a, w(12));
        assert_eq!(agc.mode(), Mode::Normal);
        assert_eq!(agc.regs.extended_address, None);
        assert_eq!(agc.cycles(), 7);
    }

    #[test]
    fn test_extended_failure_keeps_mode() {
        let mut agc = Agc::new();
        agc.execute("EXTEND", None).unwrap();

        let err = agc.execute("CA", Some(0)).unwrap_err();
        assert_eq!(err, CpuError::UnknownInstruction("CA".to_string()));
        assert_eq!(agc.mode(), Mode::Extended);
        assert_eq!(agc.cycles(), 1);

        // Next instruction still goes through the extended table.
        agc.execute("SU", Some(0)).unwrap();
        assert_eq!(agc.mode(), Mode::Normal);
    }

    #[test]
    fn test_extended_address_error_keeps_mode() {
        let mut agc = Agc::new();
        agc.execute("EXTEND", None).unwrap();
        let err = agc.execute("DV", Some(5000)).unwrap_err();
        assert!(matches!(err, CpuError::MemoryError(_)));
        assert_eq!(agc.mode(), Mode::Extended);
    }

    #[test]
    fn test_unknown_in_normal_mode() {
        let mut agc = Agc::new();
        let err = agc.execute("UNKNOWN_OP", None).unwrap_err();
        assert_eq!(err, CpuError::UnknownInstruction("UNKNOWN_OP".to_string()));
        assert_eq!(agc.mode(), Mode::Normal);
        assert_eq!(agc, Agc::new());
    }

    #[test]
    fn test_out_of_range_is_atomic() {
        let mut agc = Agc::new();
        agc.regs.a = w(5);
        let before = agc.clone();
        for op in ["XCH", "CA", "TS", "AD", "INCR", "DCA", "DXCH", "CYR"] {
            let err = agc.execute(op, Some(ERASABLE_SIZE as u16)).unwrap_err();
            assert!(matches!(err, CpuError::MemoryError(MemoryError::AddressOutOfRange { .. })));
        }
        assert_eq!(agc, before);
    }

    #[test]
    fn test_operand_checks() {
        let mut agc = Agc::new();
        assert_eq!(agc.execute("CA", None), Err(CpuError::MissingOperand(Opcode::Ca)));
        assert_eq!(agc.execute("RELINT", Some(1)), Err(CpuError::UnexpectedOperand(Opcode::Relint)));
        assert_eq!(agc.cycles(), 0);
    }

    #[test]
    fn test_execute_line() {
        let mut agc = machine_with(&[(0o10, 21)]);
        agc.execute_line("CA 0o10").unwrap();
        assert_eq!(agc.regs.a, w(21));
        assert!(matches!(agc.execute_line("CA ten"), Err(CpuError::DecodeError(_))));
        assert!(matches!(
            agc.execute_line("FOO 1"),
            Err(CpuError::UnknownInstruction(_))
        ));
    }

    #[test]
    fn test_reset_matches_new() {
        let mut agc = machine_with(&[(0, 1), (2047, 2)]);
        agc.execute("EXTEND", Some(3)).unwrap();
        agc.execute("INHINT", None).unwrap_err();
        agc.execute("MP", Some(0)).unwrap();
        agc.execute("INHINT", None).unwrap();
        agc.execute("INT", None).unwrap();
        agc.dsky_input(w(16));
        agc.interface_counter_write(2, w(7));

        agc.reset();
        assert_eq!(agc, Agc::new());
    }

    #[test]
    fn test_snapshot() {
        let mut agc = machine_with(&[(3, 0o77)]);
        agc.dsky_input(w(1));
        let snap = agc.snapshot();
        assert_eq!(snap.erasable, vec![(3, w(0o77))]);
        assert_eq!(snap.dsky, vec![w(1)]);
        assert_eq!(snap.counters.len(), 10);
        assert_eq!(snap.mode, Mode::Normal);
    }
}
