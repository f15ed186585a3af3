use crate::interval::Interval;




/**
 * Predicate vocabulary for bucket lookups. A filter receives a stored
 * member first and the query interval second. The variants below cover the
 * common cases; callers are free to pass any compatible function of their
 * own.
 */
pub type IntervalFilter<I> = fn(&I, &I) -> bool;




/**
 * Member and query have identical normalized bounds. This is the default
 * filter for node-level lookups.
 */
pub fn equal<I: Interval>(member: &I, query: &I) -> bool {
    member.norm_bounds() == query.norm_bounds()
}




/**
 * Member and query share at least one ordinal. Bounds are closed, so two
 * intervals that meet exactly at an endpoint do overlap.
 */
pub fn overlap<I: Interval>(member: &I, query: &I) -> bool {
    member.norm_start() <= query.norm_end() && query.norm_start() <= member.norm_end()
}




/**
 * Member spans the whole of the query.
 */
pub fn cover<I: Interval>(member: &I, query: &I) -> bool {
    member.norm_start() <= query.norm_start() && query.norm_end() <= member.norm_end()
}




// ============================================================================
#[cfg(test)]
mod test {

    use super::{cover, equal, overlap};

    #[test]
    fn equal_compares_bounds_only() {
        assert!( equal(&(2, 5), &(2, 5)));
        assert!(!equal(&(2, 5), &(2, 6)));
        assert!(!equal(&(2, 5), &(3, 5)));
    }

    #[test]
    fn overlap_is_closed_at_both_ends() {
        assert!( overlap(&(0, 4), &(4, 8)));
        assert!( overlap(&(4, 8), &(0, 4)));
        assert!( overlap(&(0, 9), &(3, 5)));
        assert!(!overlap(&(0, 3), &(4, 8)));
        assert!(!overlap(&(9, 12), &(4, 8)));
    }

    #[test]
    fn cover_requires_full_containment() {
        assert!( cover(&(0, 9), &(3, 5)));
        assert!( cover(&(3, 5), &(3, 5)));
        assert!(!cover(&(3, 5), &(0, 9)));
        assert!(!cover(&(0, 4), &(3, 5)));
    }
}
