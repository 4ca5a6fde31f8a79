mod emergency_codes;
mod seed_derivation;
mod window_codes;
