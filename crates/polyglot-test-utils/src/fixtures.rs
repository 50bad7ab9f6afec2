//! Known-good values for the boundary functions.

/// `0!` through `20!`, the full range that fits in `u64`.
pub const FACTORIALS: [u64; 21] = [
    1,
    1,
    2,
    6,
    24,
    120,
    720,
    5_040,
    40_320,
    362_880,
    3_628_800,
    39_916_800,
    479_001_600,
    6_227_020_800,
    87_178_291_200,
    1_307_674_368_000,
    20_922_789_888_000,
    355_687_428_096_000,
    6_402_373_705_728_000,
    121_645_100_408_832_000,
    2_432_902_008_176_640_000,
];

/// `F(0)` through `F(20)`.
pub const FIBONACCI: [u64; 21] = [
    0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987, 1_597, 2_584, 4_181, 6_765,
];

/// `F(93)`, the largest Fibonacci number that fits in `u64`.
pub const FIBONACCI_93: u64 = 12_200_160_415_121_876_738;

pub const PRIMES_UNDER_50: [i32; 15] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47];

pub const GREETING: &str = "Hello, World!";
pub const GREETING_REVERSED: &str = "!dlroW ,olleH";

/// Multi-byte input: 6 chars, 8 bytes.
pub const ACCENTED: &str = "héllø!";
pub const ACCENTED_REVERSED: &str = "!ølléh";

pub const SAMPLE_ARRAY: [i32; 5] = [1, 2, 3, 4, 5];
