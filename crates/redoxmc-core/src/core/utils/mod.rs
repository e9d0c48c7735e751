pub mod combinatorics;
