use cachesim_core::common::AccessType;
use cachesim_core::core::units::cache::Downstream;

mockall::mock! {
    pub Port {}

    impl Downstream for Port {
        fn read(&mut self, addr: u32);
        fn write(&mut self, addr: u32);
    }
}

/// Next level that records every request it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingPort {
    pub requests: Vec<(AccessType, u32)>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> Vec<u32> {
        self.filtered(AccessType::Read)
    }

    pub fn writes(&self) -> Vec<u32> {
        self.filtered(AccessType::Write)
    }

    fn filtered(&self, kind: AccessType) -> Vec<u32> {
        self.requests
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|&(_, addr)| addr)
            .collect()
    }
}

impl Downstream for RecordingPort {
    fn read(&mut self, addr: u32) {
        self.requests.push((AccessType::Read, addr));
    }

    fn write(&mut self, addr: u32) {
        self.requests.push((AccessType::Write, addr));
    }
}
