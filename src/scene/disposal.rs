use std::cell::RefCell;
use std::rc::Rc;

/// Something holding resources that must be released exactly once
///
/// Calling `dispose` again after the first time must be a no-op.
pub trait Disposable {
    fn dispose(&mut self);
}

impl<T: Disposable + ?Sized> Disposable for Rc<RefCell<T>> {
    fn dispose(&mut self) {
        self.borrow_mut().dispose();
    }
}

impl<T: Disposable + ?Sized> Disposable for Box<T> {
    fn dispose(&mut self) {
        (**self).dispose();
    }
}

/// Resources released in reverse order of acquisition
#[derive(Default)]
pub struct DisposalList {
    items: Vec<Box<dyn Disposable>>,
    released: bool,
}

impl DisposalList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: impl Disposable + 'static) {
        self.items.push(Box::new(item));
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Disposable for DisposalList {
    fn dispose(&mut self) {
        if self.released {
            return;
        }
        while let Some(mut item) = self.items.pop() {
            item.dispose();
        }
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        id: u32,
        log: Rc<RefCell<Vec<u32>>>,
    }

    impl Disposable for Probe {
        fn dispose(&mut self) {
            self.log.borrow_mut().push(self.id);
        }
    }

    #[test]
    fn test_releases_in_reverse_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut list = DisposalList::new();
        for id in 1..=3 {
            list.push(Probe { id, log: log.clone() });
        }

        list.dispose();
        assert_eq!(*log.borrow(), vec![3, 2, 1]);
    }

    #[test]
    fn test_second_dispose_is_noop() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut list = DisposalList::new();
        list.push(Probe { id: 7, log: log.clone() });

        list.dispose();
        list.dispose();
        assert_eq!(log.borrow().len(), 1);
        assert!(list.is_released());
    }

    #[test]
    fn test_nested_lists() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut inner = DisposalList::new();
        inner.push(Probe { id: 2, log: log.clone() });
        inner.push(Probe { id: 3, log: log.clone() });

        let mut outer = DisposalList::new();
        outer.push(Probe { id: 1, log: log.clone() });
        outer.push(inner);
        outer.push(Probe { id: 4, log: log.clone() });

        outer.dispose();
        assert_eq!(*log.borrow(), vec![4, 3, 2, 1]);
    }
}
