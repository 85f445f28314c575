use std::io::Write;

/// Host services available to an executing program. The context outlives any
/// single execution; the evaluator only borrows it.
pub trait Context {
    /// Sink for `print` statements and instance rendering.
    fn output(&mut self) -> &mut dyn Write;
}

/// Context writing program output to a caller-supplied sink.
pub struct StandardContext<'a> {
    output: &'a mut dyn Write,
}

impl<'a> StandardContext<'a> {
    pub fn new(output: &'a mut dyn Write) -> Self {
        Self { output }
    }
}

impl Context for StandardContext<'_> {
    fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }
}

/// Context capturing program output in memory.
#[derive(Default)]
pub struct BufferedContext {
    output: Vec<u8>,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything the program has written so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Context for BufferedContext {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.output
    }
}
