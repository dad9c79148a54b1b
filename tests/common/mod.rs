//! Simulated E32 module for host tests
//!
//! The UART, mode lines, AUX line, delay and clock all share one [`Sim`]
//! state, so a test can script the module's answers and then inspect what
//! the driver wrote, which lines it drove and how much simulated time
//! passed.

#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use ebyte::{Clock, Device};
use embedded_hal::{
    delay::DelayNs,
    digital::{self, InputPin, OutputPin},
};
use embedded_io::{ErrorKind, ErrorType, Read, ReadReady, Write};

pub const GOOD_MODEL: [u8; 6] = [0xC3, 0x32, 0x27, 0x14, 0x00, 0x00];
pub const BAD_MODEL: [u8; 6] = [0x00, 0x32, 0x27, 0x14, 0x00, 0x00];

/// Behaviour of the simulated AUX line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aux {
    /// High except while busy after a mode change
    Ready,
    /// Always low
    Never,
    /// Low until the simulated clock reaches the given time
    At(u32),
    /// Every read fails
    Broken,
}

/// One write call seen by the simulated UART
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteCall {
    pub bytes: Vec<u8>,
    pub m0: bool,
    pub m1: bool,
    /// Bytes still waiting in the receive buffer when the write happened
    pub pending_rx: usize,
}

impl WriteCall {
    pub fn in_program_mode(&self) -> bool {
        self.m0 && self.m1
    }
}

#[derive(Debug)]
pub struct Sim {
    pub now_ms: u32,
    ns_remainder: u32,
    pub m0: bool,
    pub m1: bool,
    pub line_changes: Vec<(bool, bool)>,
    /// Every attempt to drive M1 fails
    pub fail_m1: bool,
    pub aux: Aux,
    /// AUX stays low this long after every line change
    pub busy_after_switch_ms: u32,
    busy_until: Option<u32>,
    pub rx: VecDeque<u8>,
    /// Receive buffer never runs dry; every read costs 1 ms
    pub endless_rx: bool,
    pub fail_writes: bool,
    pub writes: Vec<WriteCall>,
    /// Parameter block after the head byte
    pub registers: [u8; 5],
    /// Head byte of parameter read responses
    pub parameters_head: u8,
    /// Answers to model reads, in order; `None` means silence
    pub model_replies: VecDeque<Option<[u8; 6]>>,
    /// Answer once `model_replies` is used up
    pub model_fallback: Option<[u8; 6]>,
    pub saved_heads: Vec<u8>,
    pub resets: usize,
}

impl Default for Sim {
    fn default() -> Self {
        Self {
            now_ms: 0,
            ns_remainder: 0,
            m0: false,
            m1: false,
            line_changes: Vec::new(),
            fail_m1: false,
            aux: Aux::Ready,
            busy_after_switch_ms: 0,
            busy_until: None,
            rx: VecDeque::new(),
            endless_rx: false,
            fail_writes: false,
            writes: Vec::new(),
            // Factory defaults: address 0, 9600 8N1 / 2.4k, channel 0x17
            registers: [0x00, 0x00, 0x1A, 0x17, 0x44],
            parameters_head: 0xC0,
            model_replies: VecDeque::new(),
            model_fallback: Some(GOOD_MODEL),
            saved_heads: Vec::new(),
            resets: 0,
        }
    }
}

impl Sim {
    pub fn shared() -> Rc<RefCell<Sim>> {
        Rc::new(RefCell::new(Sim::default()))
    }

    fn advance_ms(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }

    fn aux_high(&self) -> bool {
        let idle = match self.busy_until {
            Some(until) => self.now_ms >= until,
            None => true,
        };
        let level = match self.aux {
            Aux::Ready => true,
            Aux::Never | Aux::Broken => false,
            Aux::At(at) => self.now_ms >= at,
        };
        idle && level
    }

    fn line_changed(&mut self) {
        self.line_changes.push((self.m0, self.m1));
        if self.busy_after_switch_ms > 0 {
            self.busy_until = Some(self.now_ms.wrapping_add(self.busy_after_switch_ms));
        }
    }

    /// Reacts to bytes written in program mode the way the module does
    fn handle_command(&mut self, bytes: &[u8]) {
        match bytes {
            [0xC1, 0xC1, 0xC1] => {
                self.rx.push_back(self.parameters_head);
                self.rx.extend(self.registers);
            }
            [0xC3, 0xC3, 0xC3] => {
                let reply = self.model_replies.pop_front().unwrap_or(self.model_fallback);
                if let Some(reply) = reply {
                    self.rx.extend(reply);
                }
            }
            [0xC4, 0xC4, 0xC4] => self.resets += 1,
            [head @ (0xC0 | 0xC2), rest @ ..] if rest.len() == 5 => {
                self.saved_heads.push(*head);
                self.registers.copy_from_slice(rest);
            }
            _ => {}
        }
    }

    /// Writes seen in program mode
    pub fn program_writes(&self) -> Vec<Vec<u8>> {
        self.writes
            .iter()
            .filter(|write| write.in_program_mode())
            .map(|write| write.bytes.clone())
            .collect()
    }

    /// Number of writes equal to `bytes`
    pub fn count_writes(&self, bytes: &[u8]) -> usize {
        self.writes.iter().filter(|write| write.bytes == bytes).count()
    }
}

pub struct SimSerial(pub Rc<RefCell<Sim>>);

impl ErrorType for SimSerial {
    type Error = ErrorKind;
}

impl Read for SimSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut sim = self.0.borrow_mut();
        if sim.endless_rx {
            sim.advance_ms(1);
            buf.fill(0x55);
            return Ok(buf.len());
        }

        let mut n = 0;
        while n < buf.len() {
            match sim.rx.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }
}

impl ReadReady for SimSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let sim = self.0.borrow();
        Ok(sim.endless_rx || !sim.rx.is_empty())
    }
}

impl Write for SimSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut sim = self.0.borrow_mut();
        if sim.fail_writes {
            return Err(ErrorKind::Other);
        }

        let call = WriteCall {
            bytes: buf.to_vec(),
            m0: sim.m0,
            m1: sim.m1,
            pending_rx: sim.rx.len(),
        };
        if call.in_program_mode() {
            sim.handle_command(buf);
        }
        sim.writes.push(call);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    M0,
    M1,
}

pub struct SimPin {
    sim: Rc<RefCell<Sim>>,
    line: Line,
    pub broken: bool,
}

impl SimPin {
    pub fn new(sim: &Rc<RefCell<Sim>>, line: Line) -> Self {
        Self {
            sim: sim.clone(),
            line,
            broken: false,
        }
    }

    fn drive(&mut self, level: bool) -> Result<(), digital::ErrorKind> {
        let mut sim = self.sim.borrow_mut();
        if self.broken || (self.line == Line::M1 && sim.fail_m1) {
            return Err(digital::ErrorKind::Other);
        }
        match self.line {
            Line::M0 => sim.m0 = level,
            Line::M1 => sim.m1 = level,
        }
        sim.line_changed();
        Ok(())
    }
}

impl digital::ErrorType for SimPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

pub struct SimAux(pub Rc<RefCell<Sim>>);

impl digital::ErrorType for SimAux {
    type Error = digital::ErrorKind;
}

impl InputPin for SimAux {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let sim = self.0.borrow();
        if sim.aux == Aux::Broken {
            return Err(digital::ErrorKind::Other);
        }
        Ok(sim.aux_high())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct SimDelay(pub Rc<RefCell<Sim>>);

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut sim = self.0.borrow_mut();
        let total = sim.ns_remainder as u64 + ns as u64;
        sim.advance_ms((total / 1_000_000) as u32);
        sim.ns_remainder = (total % 1_000_000) as u32;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().advance_ms(ms);
    }
}

pub struct SimClock(pub Rc<RefCell<Sim>>);

impl Clock for SimClock {
    fn now_ms(&mut self) -> u32 {
        self.0.borrow().now_ms
    }
}

pub type SimDevice<AUX> = Device<SimSerial, SimPin, SimPin, AUX, SimDelay, SimClock>;

pub fn device(sim: &Rc<RefCell<Sim>>) -> SimDevice<SimAux> {
    Device::new(
        SimSerial(sim.clone()),
        SimPin::new(sim, Line::M0),
        SimPin::new(sim, Line::M1),
        SimAux(sim.clone()),
        SimDelay(sim.clone()),
        SimClock(sim.clone()),
    )
}

pub fn device_without_aux(sim: &Rc<RefCell<Sim>>) -> SimDevice<ebyte::NoAux> {
    Device::without_aux(
        SimSerial(sim.clone()),
        SimPin::new(sim, Line::M0),
        SimPin::new(sim, Line::M1),
        SimDelay(sim.clone()),
        SimClock(sim.clone()),
    )
}
