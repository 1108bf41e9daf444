//! Storage of dynamic and static bodies, addressed by stable handles.

use crate::{
    body::{Body, BodyHandle, MassData, Material, Motion, Shape, Transform},
    error::PhysicsError,
    Result,
};
use fnv::FnvHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Partition {
    Dynamic,
    Static,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    partition: Partition,
    index: usize,
}

/// Bodies partitioned by inverse mass at insertion. A body never changes partition.
#[derive(Debug, Clone)]
pub struct Registry {
    dynamic: Vec<Body>,
    statics: Vec<Body>,
    slots: FnvHashMap<BodyHandle, Slot>,
    next_id: u32,
    capacity: usize,
}

impl Registry {
    pub fn with_capacity(capacity: usize) -> Registry {
        Registry {
            dynamic: Vec::new(),
            statics: Vec::new(),
            slots: FnvHashMap::default(),
            next_id: 0,
            capacity,
        }
    }

    pub fn insert(&mut self, shape: Shape, mass: MassData, transform: Transform, material: Material, motion: Motion) -> Result<BodyHandle> {
        //! Stores a new body, routed by its inverse mass.
        if self.len() >= self.capacity {
            return Err(PhysicsError::CapacityExceeded { capacity: self.capacity });
        }

        let handle = BodyHandle(self.next_id);
        self.next_id = self.next_id.checked_add(1).ok_or(PhysicsError::HandlesExhausted)?;

        let body = Body::new(handle, shape, mass, transform, material, motion);
        let (partition, list) = if mass.is_static() {
            (Partition::Static, &mut self.statics)
        } else {
            (Partition::Dynamic, &mut self.dynamic)
        };
        list.push(body);
        self.slots.insert(handle, Slot { partition, index: list.len() - 1 });
        Ok(handle)
    }

    pub fn remove(&mut self, handle: BodyHandle) -> Option<Body> {
        //! Removes a body. The rest of its partition keeps insertion order.
        let Slot { partition, index } = self.slots.remove(&handle)?;
        let list = match partition {
            Partition::Dynamic => &mut self.dynamic,
            Partition::Static => &mut self.statics,
        };

        let body = list.remove(index);
        // everything after the gap shifted down by one
        for (index, moved) in list.iter().enumerate().skip(index) {
            self.slots.insert(moved.handle(), Slot { partition, index });
        }
        Some(body)
    }

    #[inline]
    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        let slot = self.slots.get(&handle)?;
        match slot.partition {
            Partition::Dynamic => self.dynamic.get(slot.index),
            Partition::Static => self.statics.get(slot.index),
        }
    }
    #[inline]
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let slot = self.slots.get(&handle)?;
        match slot.partition {
            Partition::Dynamic => self.dynamic.get_mut(slot.index),
            Partition::Static => self.statics.get_mut(slot.index),
        }
    }
    #[inline]
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.slots.contains_key(&handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dynamic.len() + self.statics.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn dynamic(&self) -> &[Body] {
        &self.dynamic
    }
    #[inline]
    pub fn statics(&self) -> &[Body] {
        &self.statics
    }
    #[inline]
    pub fn partitions_mut(&mut self) -> (&mut [Body], &mut [Body]) {
        //! Both partitions at once, for stepping. Bodies can be mutated but not moved between or out of them.
        (&mut self.dynamic, &mut self.statics)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        //! Dynamic bodies, then static bodies.
        self.dynamic.iter().chain(self.statics.iter())
    }
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.dynamic.iter_mut().chain(self.statics.iter_mut())
    }
}
