//! Frame lifecycle hooks

/// Callbacks the host invokes around each rendered frame
///
/// Both hooks default to no-ops until the UI layer installs its own.
pub struct FrameHooks {
    begin_frame: Box<dyn FnMut()>,
    end_frame: Box<dyn FnMut()>,
}

impl FrameHooks {
    pub fn new() -> Self {
        Self {
            begin_frame: Box::new(|| {}),
            end_frame: Box::new(|| {}),
        }
    }

    pub fn set_begin_frame(&mut self, hook: impl FnMut() + 'static) {
        self.begin_frame = Box::new(hook);
    }

    pub fn set_end_frame(&mut self, hook: impl FnMut() + 'static) {
        self.end_frame = Box::new(hook);
    }

    pub fn begin_frame(&mut self) {
        (self.begin_frame)();
    }

    pub fn end_frame(&mut self) {
        (self.end_frame)();
    }
}

impl Default for FrameHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHooks").finish_non_exhaustive()
    }
}
