//! SYCL aspect names and their numeric ids.
//!
//! Ids are the values the compiler packs into the `aspects` property.

/// Known aspects as `(name, id)` pairs.
pub const ASPECTS: &[(&str, u32)] = &[
    ("host", 0),
    ("cpu", 1),
    ("gpu", 2),
    ("accelerator", 3),
    ("custom", 4),
    ("fp16", 5),
    ("fp64", 6),
    ("image", 9),
    ("online_compiler", 10),
    ("online_linker", 11),
    ("queue_profiling", 12),
    ("usm_device_allocations", 13),
    ("usm_host_allocations", 14),
    ("usm_shared_allocations", 15),
    ("usm_system_allocations", 17),
    ("ext_intel_pci_address", 18),
    ("ext_intel_gpu_eu_count", 19),
    ("ext_intel_gpu_eu_simd_width", 20),
    ("ext_intel_gpu_slices", 21),
    ("ext_intel_gpu_subslices_per_slice", 22),
    ("ext_intel_gpu_eu_count_per_subslice", 23),
    ("ext_intel_max_mem_bandwidth", 24),
    ("ext_intel_mem_channel", 25),
    ("usm_atomic_host_allocations", 26),
    ("usm_atomic_shared_allocations", 27),
    ("atomic64", 28),
];

/// Id of a named aspect.
pub fn aspect_id(name: &str) -> Option<u32> {
    ASPECTS.iter().find(|(n, _)| *n == name).map(|(_, id)| *id)
}

/// Name of an aspect id, if it is a known one.
pub fn aspect_name(id: u32) -> Option<&'static str> {
    ASPECTS.iter().find(|(_, i)| *i == id).map(|(n, _)| *n)
}
