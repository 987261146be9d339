use crate::core::{AttributeIndex, CatValue, Schema};

/// One labelled record: a categorical value per attribute plus a class.
///
/// Instances are reusable buffers. A stream driver allocates one with
/// [`Instance::for_schema`] and refills it on every
/// [`advance`](crate::streams::InstanceStream::advance); the statistics
/// engine never retains an instance beyond a single update or query call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    values: Vec<CatValue>,
    class: CatValue,
}

impl Instance {
    pub fn new(values: Vec<CatValue>, class: CatValue) -> Self {
        Self { values, class }
    }

    /// An all-zero instance sized for `schema`, intended as a stream buffer.
    pub fn for_schema(schema: &Schema) -> Self {
        Self {
            values: vec![0; schema.num_attributes()],
            class: 0,
        }
    }

    pub fn num_attributes(&self) -> usize {
        self.values.len()
    }

    /// Value of attribute `a`. Panics if `a` is out of range.
    #[inline]
    pub fn value(&self, a: AttributeIndex) -> CatValue {
        self.values[a]
    }

    #[inline]
    pub fn class(&self) -> CatValue {
        self.class
    }

    pub fn set_value(&mut self, a: AttributeIndex, v: CatValue) {
        self.values[a] = v;
    }

    pub fn set_class(&mut self, y: CatValue) {
        self.class = y;
    }

    /// Overwrites the buffer in place.
    pub fn assign(&mut self, values: &[CatValue], class: CatValue) {
        self.values.clear();
        self.values.extend_from_slice(values);
        self.class = class;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::binary_pair_schema;

    #[test]
    fn test_buffer_reuse() {
        let schema = binary_pair_schema();
        let mut inst = Instance::for_schema(&schema);
        assert_eq!(inst.num_attributes(), 2);
        assert_eq!(inst.value(0), 0);

        inst.assign(&[1, 0], 1);
        assert_eq!(inst.value(0), 1);
        assert_eq!(inst.value(1), 0);
        assert_eq!(inst.class(), 1);

        inst.set_value(1, 1);
        inst.set_class(0);
        assert_eq!(inst, Instance::new(vec![1, 1], 0));
    }
}
