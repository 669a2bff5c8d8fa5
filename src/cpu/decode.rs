//! Opcode set and instruction tables.
//!
//! Instructions arrive as a mnemonic plus at most one integer operand. The
//! mnemonic is resolved against one of two tables:
//! - the base table, holding every [`Opcode`]
//! - the extended table, holding only MP, DV and SU, consulted for exactly
//!   one dispatch after EXTEND
//!
//! Both tables contain MP, DV and SU, so EXTEND is not required to reach them.

use std::fmt;
use std::str::FromStr;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Which instruction table a lookup goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Table {
    /// Every opcode.
    Base,
    /// The one-shot table selected by EXTEND.
    Extended,
}

/// How an opcode treats its operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// An operand must be present (address, mask, jump target or channel).
    Required,
    /// An operand may be given; it is recorded or ignored.
    Optional,
    /// No operand may be given.
    None,
}

macro_rules! opcodes {
    ($( $(#[$doc:meta])* $variant:ident => $mnemonic:literal, $cycles:expr, $operand:ident; )*) => {
        /// Every instruction known to the simulator.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Opcode {
            $( $(#[$doc])* $variant, )*
        }

        impl Opcode {
            /// All opcodes in base-table order.
            pub const ALL: &'static [Opcode] = &[ $( Opcode::$variant, )* ];

            /// Assembly mnemonic.
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $( Opcode::$variant => $mnemonic, )*
                }
            }

            /// Fixed cycle cost charged on successful dispatch.
            pub const fn cycles(self) -> u8 {
                match self {
                    $( Opcode::$variant => $cycles, )*
                }
            }

            /// Operand requirement.
            pub const fn operand(self) -> OperandKind {
                match self {
                    $( Opcode::$variant => OperandKind::$operand, )*
                }
            }

            /// Look up a mnemonic in the base table.
            pub fn from_mnemonic(s: &str) -> Option<Opcode> {
                match s {
                    $( $mnemonic => Some(Opcode::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

opcodes! {
    // ==================== Single-word ====================
    /// Transfer control: Z := K
    Tc => "TC", 1, Required;
    /// Count, compare and skip
    Ccs => "CCS", 2, Required;
    /// Modeled as a plain transfer: Z := K
    Index => "INDEX", 1, Required;
    /// Exchange A and M[K]
    Xch => "XCH", 2, Required;
    /// Clear and add: A := M[K]
    Ca => "CA", 2, Required;
    /// Clear and subtract: A := -M[K]
    Cs => "CS", 2, Required;
    /// Transfer to storage: M[K] := A, A := +0
    Ts => "TS", 2, Required;
    /// Add: A := A + M[K]
    Ad => "AD", 2, Required;
    /// Mask: A := A & K
    Msk => "MSK", 1, Required;
    /// Alternate spelling of MSK
    Mask => "MASK", 1, Required;
    /// Route the next dispatch to the extended table
    Extend => "EXTEND", 1, Optional;

    // ==================== Extended arithmetic ====================
    /// Multiply: (L, A) := A * M[K]
    Mp => "MP", 6, Required;
    /// Divide: A := (L, A) / M[K], L := remainder
    Dv => "DV", 6, Required;
    /// Subtract: A := A - M[K]
    Su => "SU", 2, Required;

    // ==================== Double-word ====================
    /// Double clear and add: (A, L) := (M[K], M[K+1])
    Dca => "DCA", 4, Required;
    /// Double clear and subtract: (A, L) := (-M[K], -M[K+1])
    Dcs => "DCS", 4, Required;
    /// Double add into (A, L)
    Dad => "DAD", 6, Required;
    /// Double subtract from (A, L)
    Dsu => "DSU", 6, Required;

    // ==================== Exchange and counters ====================
    /// Exchange L and M[K]
    Lxch => "LXCH", 2, Required;
    /// Exchange Q and M[K]
    Qxch => "QXCH", 2, Required;
    /// Increment: M[K] := M[K] + 1
    Incr => "INCR", 2, Required;
    /// Augment; no effect in this model
    Aug => "AUG", 0, Optional;
    /// Diminish: M[K] := M[K] - 1
    Dim => "DIM", 2, Required;

    // ==================== Branches ====================
    /// Branch on zero or positive A
    Bzf => "BZF", 2, Required;
    /// Branch on nonzero negative A
    Bzm => "BZM", 2, Required;

    // ==================== Interrupt control ====================
    /// Release (enable) interrupts
    Relint => "RELINT", 1, None;
    /// Inhibit interrupts
    Inhint => "INHINT", 1, None;
    /// Request an interrupt
    Edrupt => "EDRUPT", 1, None;
    /// Clear the pending interrupt
    Resume => "RESUME", 1, None;

    // ==================== Editing ====================
    /// Cycle M[K] right by one bit
    Cyr => "CYR", 2, Required;
    /// Shift M[K] right by one bit
    Sr => "SR", 2, Required;
    /// Shift M[K] left by one bit
    Sl => "SL", 2, Required;

    // ==================== Counter increments ====================
    /// Increment M[K] when non-negative
    Pinc => "PINC", 2, Required;
    /// Increment M[K] when negative
    Minc => "MINC", 2, Required;

    // ==================== Double exchange and interrupt ====================
    /// Exchange (A, L) with (M[K], M[K+1])
    Dxch => "DXCH", 4, Required;
    /// Involuntary interrupt request
    Int => "INT", 1, Optional;

    // ==================== Storage and channels ====================
    /// Double add (A, L) into (M[K], M[K+1])
    Das => "DAS", 6, Required;
    /// A := counter[K]
    Read => "READ", 2, Required;
    /// counter[K] := A
    Write => "WRITE", 2, Required;
    /// A := counter[K], counter[K] := 0
    Rand => "RAND", 2, Required;
    /// No operation
    Noop => "NOOP", 1, None;
}

impl Opcode {
    /// Opcodes reachable from the extended table.
    pub const EXTENDED: &'static [Opcode] = &[Opcode::Mp, Opcode::Dv, Opcode::Su];

    /// Whether this opcode is present in `table`.
    pub fn in_table(self, table: Table) -> bool {
        match table {
            Table::Base => true,
            Table::Extended => Self::EXTENDED.contains(&self),
        }
    }

    /// Look up a mnemonic in the given table.
    pub fn lookup(s: &str, table: Table) -> Option<Opcode> {
        Self::from_mnemonic(s).filter(|op| op.in_table(table))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opcode::from_mnemonic(s).ok_or_else(|| DecodeError::UnknownMnemonic(s.to_string()))
    }
}

/// An instruction ready for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand: Option<u16>,
}

impl Instruction {
    /// An instruction with an operand.
    pub fn new(opcode: Opcode, operand: u16) -> Self {
        Self { opcode, operand: Some(operand) }
    }

    /// An instruction without an operand.
    pub fn bare(opcode: Opcode) -> Self {
        Self { opcode, operand: None }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operand {
            Some(k) => write!(f, "{} 0o{:o}", self.opcode, k),
            None => write!(f, "{}", self.opcode),
        }
    }
}

/// Parse `"MNEMONIC"` or `"MNEMONIC OPERAND"`.
///
/// The operand is decimal, or octal with a `0o` prefix.
impl FromStr for Instruction {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let mnemonic = parts.next().ok_or(DecodeError::Empty)?;
        let opcode: Opcode = mnemonic.parse()?;

        let operand = match parts.next() {
            Some(text) => Some(parse_operand(text)?),
            None => None,
        };

        if let Some(extra) = parts.next() {
            return Err(DecodeError::TrailingInput(extra.to_string()));
        }

        Ok(Instruction { opcode, operand })
    }
}

/// Parse a decimal or `0o`-prefixed octal operand.
pub fn parse_operand(text: &str) -> Result<u16, DecodeError> {
    let parsed = match text.strip_prefix("0o") {
        Some(octal) => u16::from_str_radix(octal, 8),
        None => text.parse::<u16>(),
    };
    parsed.map_err(|_| DecodeError::BadOperand(text.to_string()))
}

/// Errors that can occur while parsing an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty instruction")]
    Empty,

    #[error("unknown mnemonic: {0}")]
    UnknownMnemonic(String),

    #[error("invalid operand: {0}")]
    BadOperand(String),

    #[error("unexpected trailing input: {0}")]
    TrailingInput(String),
}
