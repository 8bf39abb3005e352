/// Generates a consuming builder-style setter for a struct field.
macro_rules! impl_setter {
    ($self:ident, $field:ident, $type:ty) => {
        pub fn $field(mut $self, $field: $type) -> Self {
            $self.$field = $field;
            $self
        }
    };
}

/// Elements of the sorted slice `a` that are missing from the sorted slice `b`.
pub(crate) fn sorted_difference(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut result = Vec::with_capacity(a.len());
    let mut j = 0;
    for x in a.iter().copied() {
        while j < b.len() && b[j] < x {
            j += 1;
        }
        if j >= b.len() || b[j] != x {
            result.push(x);
        }
    }
    result
}

/// Size of the symmetric difference of two sorted slices.
pub(crate) fn symmetric_difference_len(a: &[usize], b: &[usize]) -> usize {
    let (mut i, mut j, mut count) = (0, 0, 0);
    while i < a.len() && j < b.len() {
        if a[i] == b[j] {
            i += 1;
            j += 1;
        } else if a[i] < b[j] {
            count += 1;
            i += 1;
        } else {
            count += 1;
            j += 1;
        }
    }
    count + (a.len() - i) + (b.len() - j)
}

pub(crate) fn sorted_insert(set: &mut Vec<usize>, v: usize) {
    if let Err(pos) = set.binary_search(&v) {
        set.insert(pos, v);
    }
}

pub(crate) fn sorted_remove(set: &mut Vec<usize>, v: usize) {
    if let Ok(pos) = set.binary_search(&v) {
        set.remove(pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference() {
        assert_eq!(sorted_difference(&[1, 2, 4, 7], &[2, 3, 7]), vec![1, 4]);
        assert_eq!(sorted_difference(&[], &[2, 3]), Vec::<usize>::new());
        assert_eq!(sorted_difference(&[5], &[]), vec![5]);
    }

    #[test]
    fn symmetric_difference() {
        assert_eq!(symmetric_difference_len(&[1, 2, 4], &[2, 3, 4]), 2);
        assert_eq!(symmetric_difference_len(&[1, 2], &[1, 2]), 0);
        assert_eq!(symmetric_difference_len(&[], &[1, 2, 3]), 3);
    }

    #[test]
    fn insert_and_remove() {
        let mut set = vec![1, 5];
        sorted_insert(&mut set, 3);
        sorted_insert(&mut set, 3);
        assert_eq!(set, vec![1, 3, 5]);
        sorted_remove(&mut set, 1);
        sorted_remove(&mut set, 9);
        assert_eq!(set, vec![3, 5]);
    }
}
