use crate::plan::barriers::BarrierSelector;
use crate::util::constants::*;
use crate::util::conversions::raw_is_aligned;

fn always_valid<T>(_: &T) -> bool {
    true
}

macro_rules! options {
    ($($name:ident: $type:ty[$validator:expr] = $default:expr),*,) => [
        options!($($name: $type[$validator] = $default),*);
    ];
    ($($name:ident: $type:ty[$validator:expr] = $default:expr),*) => [
        /// Tunables for the allocation, barrier and hashcode paths. They are read once when a
        /// [`crate::GcHelper`] is built and never change afterwards.
        #[derive(Clone, Debug)]
        pub struct Options {
            $(pub $name: $type),*
        }
        impl Options {
            /// Set an option by its snake case name. Returns false, leaving the current value in
            /// place, if the key is unknown or the value cannot be parsed or fails validation.
            pub fn set_from_str(&mut self, s: &str, val: &str) -> bool {
                match s {
                    // Parse the given value from str (by env vars or by calling set_option()) to the right type
                    $(stringify!($name) => if let Ok(ref val) = val.parse::<$type>() {
                        // Validate
                        let validate_fn = $validator;
                        let is_valid = validate_fn(val);
                        if is_valid {
                            // Only set value if valid.
                            self.$name = val.clone();
                        } else {
                            warn!("Unable to set {}={:?}. Invalid value. Default value will be used.", s, val);
                        }
                        is_valid
                    } else {
                        warn!("Unable to set {}={:?}. Cant parse value. Default value will be used.", s, val);
                        false
                    })*
                    _ => {
                        warn!("Unknown option {}={:?}. Ignored.", s, val);
                        false
                    }
                }
            }
        }
        impl Default for Options {
            fn default() -> Self {
                let mut options = Options {
                    $($name: $default),*
                };

                // If we have env vars that start with GC_FASTPATH_ and match any option (such as GC_FASTPATH_TLA_SIZE),
                // we set the option to its value (if it is a valid value). Otherwise, use the default value.
                const PREFIX: &str = "GC_FASTPATH_";
                for (key, val) in std::env::vars() {
                    // strip the prefix, and get the lower case string
                    if let Some(rest_of_key) = key.strip_prefix(PREFIX) {
                        let lowercase: &str = &rest_of_key.to_lowercase();
                        match lowercase {
                            $(stringify!($name) => { options.set_from_str(lowercase, &val); },)*
                            _ => {}
                        }
                    }
                }
                options
            }
        }
    ]
}

options! {
    // The write barrier installed for reference stores.
    barrier:                BarrierSelector [always_valid] = BarrierSelector::GenRememberedSet,
    // Is the heap generational? When false, the generational barrier degenerates to a plain store.
    gen_mode:               bool            [always_valid] = true,
    // Objects larger than this (in bytes) skip the thread-local buffer and go to the slow allocator.
    large_object_threshold: usize           [|v: &usize| *v >= MIN_OBJECT_SIZE] = DEFAULT_LARGE_OBJECT_THRESHOLD,
    // Zero the TLA lazily, a quantum at a time, with prefetching ahead of the ceiling.
    // When false, slabs are zeroed in full when a TLA is refilled.
    prefetch:               bool            [always_valid] = false,
    // How far (in bytes) past the new ceiling to prefetch.
    prefetch_distance:      usize           [always_valid] = DEFAULT_PREFETCH_DISTANCE,
    // Bytes between two prefetch hints.
    prefetch_stride:        usize           [|v: &usize| v.is_power_of_two()] = DEFAULT_PREFETCH_STRIDE,
    // How far the ceiling moves each time the pipeline zeroes ahead. Must be whole cache lines.
    zeroing_size:           usize           [|v: &usize| *v >= BYTES_IN_CACHE_LINE && raw_is_aligned(*v, BYTES_IN_CACHE_LINE)] = DEFAULT_ZEROING_SIZE,
    // The slab size a TLA is refilled with.
    tla_size:               usize           [|v: &usize| *v >= BYTES_IN_PAGE && raw_is_aligned(*v, BYTES_IN_PAGE)] = DEFAULT_TLA_SIZE,
}
