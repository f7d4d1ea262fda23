use crate::{RenderError, SQUARE_VERTICES};

/// Opaque handle to one square's six vertex slots inside a render object.
///
/// Only `add_square` creates these, so a slot is always aligned to a square
/// boundary of the object that issued it. Handing a slot to a different
/// object is caught by the allocated-range check unless that object happens
/// to have allocated at least as far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SquareSlot {
    first_vertex: u32,
}

impl SquareSlot {
    pub fn first_vertex(&self) -> u32 {
        self.first_vertex
    }
}

/// Bump allocator over a fixed vertex capacity. Offsets only grow; a slot is
/// never returned to a free pool.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SlotAllocator {
    next_vertex: u32,
    max_vertices: u32,
}

impl SlotAllocator {
    pub(crate) fn new(max_vertices: u32) -> Self {
        Self {
            next_vertex: 0,
            max_vertices,
        }
    }

    pub(crate) fn alloc_square(&mut self) -> Result<SquareSlot, RenderError> {
        if self.next_vertex + SQUARE_VERTICES > self.max_vertices {
            return Err(RenderError::BufferFull {
                capacity: self.max_vertices,
            });
        }

        let slot = SquareSlot {
            first_vertex: self.next_vertex,
        };
        self.next_vertex += SQUARE_VERTICES;

        Ok(slot)
    }

    /// Rejects slots that extend past what has been allocated so far.
    pub(crate) fn check(&self, slot: SquareSlot) -> Result<(), RenderError> {
        if slot.first_vertex + SQUARE_VERTICES > self.next_vertex {
            return Err(RenderError::SlotOutOfRange {
                first_vertex: slot.first_vertex,
                allocated: self.next_vertex,
            });
        }

        Ok(())
    }

    /// Number of vertices written so far; the draw range is `0..written()`.
    pub(crate) fn written(&self) -> u32 {
        self.next_vertex
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.max_vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_contiguous_squares() {
        let mut slots = SlotAllocator::new(18);

        assert_eq!(slots.alloc_square().unwrap().first_vertex(), 0);
        assert_eq!(slots.alloc_square().unwrap().first_vertex(), 6);
        assert_eq!(slots.alloc_square().unwrap().first_vertex(), 12);
        assert_eq!(slots.written(), 18);
    }

    #[test]
    fn errors_once_full() {
        let mut slots = SlotAllocator::new(12);

        slots.alloc_square().unwrap();
        slots.alloc_square().unwrap();

        assert!(matches!(
            slots.alloc_square(),
            Err(RenderError::BufferFull { capacity: 12 })
        ));
        // The failed allocation must not have consumed anything.
        assert_eq!(slots.written(), 12);
    }

    #[test]
    fn partial_trailing_capacity_is_unusable() {
        let mut slots = SlotAllocator::new(8);

        slots.alloc_square().unwrap();
        assert!(slots.alloc_square().is_err());
    }

    #[test]
    fn check_accepts_every_allocated_slot() {
        let mut slots = SlotAllocator::new(12);

        let first = slots.alloc_square().unwrap();
        let second = slots.alloc_square().unwrap();

        assert!(slots.check(first).is_ok());
        assert!(slots.check(second).is_ok());
    }

    #[test]
    fn check_rejects_unallocated_range() {
        let mut source = SlotAllocator::new(12);
        source.alloc_square().unwrap();
        let second = source.alloc_square().unwrap();

        let mut target = SlotAllocator::new(12);
        target.alloc_square().unwrap();

        // `second` starts at vertex 6, but `target` has only written 0..6.
        assert!(matches!(
            target.check(second),
            Err(RenderError::SlotOutOfRange {
                first_vertex: 6,
                allocated: 6,
            })
        ));
    }
}
