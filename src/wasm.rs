//! WebAssembly bindings for the AGC simulator.
//!
//! This module provides JavaScript-friendly wrappers around the core machine.

use wasm_bindgen::prelude::*;
use crate::{Agc, Word};
use crate::cpu::ERASABLE_SIZE;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WebAssembly-friendly machine wrapper.
#[wasm_bindgen]
pub struct WasmAgc {
    agc: Agc,
}

#[wasm_bindgen]
impl WasmAgc {
    /// Create a new machine.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { agc: Agc::new() }
    }

    /// Execute one instruction line such as `"CA 0o10"`.
    #[wasm_bindgen]
    pub fn execute(&mut self, line: &str) -> Result<(), JsError> {
        self.agc
            .execute_line(line)
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Reset to the power-on state.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.agc.reset();
    }

    /// Get cycle count.
    #[wasm_bindgen]
    pub fn cycles(&self) -> u64 {
        self.agc.cycles()
    }

    /// Whether the next instruction goes through the extended table.
    #[wasm_bindgen]
    pub fn extended(&self) -> bool {
        self.agc.regs.extended_mode
    }

    /// Get accumulator as a raw 15-bit value.
    #[wasm_bindgen]
    pub fn accumulator(&self) -> u16 {
        self.agc.regs.a.raw()
    }

    /// Get L register as a raw 15-bit value.
    #[wasm_bindgen]
    pub fn l_register(&self) -> u16 {
        self.agc.regs.l.raw()
    }

    /// Get program counter.
    #[wasm_bindgen]
    pub fn pc(&self) -> u16 {
        self.agc.regs.pc.raw()
    }

    /// Write an erasable cell.
    #[wasm_bindgen]
    pub fn poke(&mut self, addr: usize, value: u16) -> Result<(), JsError> {
        self.agc
            .mem
            .write(addr, Word::new(value))
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Read an erasable cell; 0 when out of range.
    #[wasm_bindgen]
    pub fn memory_at(&self, addr: usize) -> u16 {
        self.agc.mem.read(addr).map(Word::raw).unwrap_or(0)
    }

    /// All erasable memory as a typed array.
    #[wasm_bindgen]
    pub fn memory_all(&self) -> js_sys::Uint16Array {
        let raw: Vec<u16> = self.agc.mem.erasable().iter().map(|w| w.raw()).collect();
        debug_assert_eq!(raw.len(), ERASABLE_SIZE);
        js_sys::Uint16Array::from(raw.as_slice())
    }

    /// Queue a DSKY word.
    #[wasm_bindgen]
    pub fn dsky_input(&mut self, value: u16) {
        self.agc.dsky_input(Word::new(value));
    }

    /// Pop a DSKY word; `undefined` when the queue is empty.
    #[wasm_bindgen]
    pub fn dsky_output(&mut self) -> Option<u16> {
        self.agc.dsky_output().map(Word::raw)
    }

    /// Get the full observable state as a JSON string.
    #[wasm_bindgen]
    pub fn state_json(&self) -> Result<String, JsError> {
        serde_json::to_string(&self.agc.snapshot()).map_err(|e| JsError::new(&e.to_string()))
    }
}

impl Default for WasmAgc {
    fn default() -> Self {
        Self::new()
    }
}
