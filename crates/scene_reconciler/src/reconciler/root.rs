use super::{can_update, mount, update, Fiber};
use crate::element::Element;
use crate::host::HostConfig;

/// One container and the tree currently rendered into it
#[derive(Debug)]
pub struct Root<I> {
    container: I,
    current: Option<Fiber<I>>,
}

impl<I: Copy + Eq + std::fmt::Debug> Root<I> {
    /// Root with nothing rendered yet
    pub fn new(container: I) -> Self {
        Self {
            container,
            current: None,
        }
    }

    /// Container instance
    pub fn container(&self) -> I {
        self.container
    }

    /// Currently mounted tree
    pub fn current(&self) -> Option<&Fiber<I>> {
        self.current.as_ref()
    }

    /// Render `element` into the container as one commit and return the
    /// public instance of its root
    pub fn render<H>(&mut self, host: &mut H, element: &Element) -> Result<I, H::Error>
    where
        H: HostConfig<Instance = I>,
    {
        host.prepare_for_commit();

        // The mounted tree stays in `current` until the host has removed it
        let instance = match self.current.as_mut() {
            Some(fiber) if can_update(host, &*fiber, element) => {
                update(host, fiber, element)?;
                fiber.instance
            }
            _ => {
                if let Some(previous) = &self.current {
                    host.remove_child(self.container, previous.instance)?;
                    self.current = None;
                }
                let fiber = mount(host, element)?;
                host.append_child(self.container, fiber.instance)?;
                let instance = fiber.instance;
                self.current = Some(fiber);
                instance
            }
        };

        host.reset_after_commit()?;
        Ok(host.get_public_instance(instance))
    }

    /// Tear the whole tree down as one commit.
    ///
    /// Returns `false` when nothing was rendered.
    pub fn unmount<H>(&mut self, host: &mut H) -> Result<bool, H::Error>
    where
        H: HostConfig<Instance = I>,
    {
        let Some(fiber) = &self.current else {
            return Ok(false);
        };
        host.prepare_for_commit();
        host.remove_child(self.container, fiber.instance)?;
        self.current = None;
        host.reset_after_commit()?;
        Ok(true)
    }
}
