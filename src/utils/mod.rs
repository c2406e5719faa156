//! Project-specific utilities live here.

/// Issues `<prefix><n>` ids from a counter that only moves forward.
#[derive(Debug, Clone)]
pub struct IdSequence {
    prefix: &'static str,
    next: u64,
}

impl IdSequence {
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    pub fn issue(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Skip past an id that entered the collection from elsewhere (seed data,
    /// restored sessions) so it is never issued again.
    pub fn observe(&mut self, id: &str) {
        let issued = id
            .strip_prefix(self.prefix)
            .and_then(|n| n.parse::<u64>().ok());

        if let Some(n) = issued {
            self.next = self.next.max(n + 1);
        }
    }
}
