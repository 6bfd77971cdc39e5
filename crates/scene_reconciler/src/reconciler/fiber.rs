use crate::element::Element;

/// A mounted element: the element it was last rendered from (children
/// stripped), its host instance, and its mounted children in order
#[derive(Debug, Clone, PartialEq)]
pub struct Fiber<I> {
    /// Element shell last applied to the instance
    pub element: Element,
    /// Host instance
    pub instance: I,
    /// Mounted children in tree order
    pub children: Vec<Fiber<I>>,
}

impl<I: Copy> Fiber<I> {
    /// Fiber for a freshly created instance, with no children yet
    pub fn new(element: &Element, instance: I) -> Self {
        Self {
            element: element.shell(),
            instance,
            children: Vec::new(),
        }
    }
}
