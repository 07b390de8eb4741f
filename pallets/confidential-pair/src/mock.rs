use crate as pallet_confidential_pair;
use crate::obfuscation::{MULTIPLIER_DRAW_SPAN, NOISE_SPAN};
use confidential_amm_primitives::{
    Cipher, Cleartexts, ConfidentialTokens, DecryptionGateway, DecryptionProof, ExternalCipher,
    FheAcl, FheOps, FheType, Handle, InputProof, RequestId,
};
use frame_support::{
    construct_runtime, derive_impl, ord_parameter_types, parameter_types,
    traits::{ConstU64, UnixTime},
    PalletId,
};
use frame_system::EnsureSignedBy;
use parity_scale_codec::Encode;
use sp_core::hashing::blake2_256;
use sp_runtime::{BuildStorage, DispatchError, DispatchResult};
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet, VecDeque},
};

pub type AccountId = u64;
pub type AssetId = u32;
type Block = frame_system::mocking::MockBlock<Test>;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const FACTORY: AccountId = 10;
pub const RELAYER: AccountId = 11;
pub const SCANNER: AccountId = 12;

pub const TOKEN0: AssetId = 1;
pub const TOKEN1: AssetId = 2;
pub const LP: AssetId = 100;

/// Unix seconds at genesis.
pub const GENESIS: u64 = 1_700_000_000;

construct_runtime!(
    pub enum Test {
        System: frame_system,
        Timestamp: pallet_timestamp,
        Pair: pallet_confidential_pair,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type Block = Block;
}

impl pallet_timestamp::Config for Test {
    type Moment = u64;
    type OnTimestampSet = ();
    type MinimumPeriod = ConstU64<1>;
    type WeightInfo = ();
}

parameter_types! {
    pub const PairPalletId: PalletId = PalletId(*b"py/cpair");
    pub const LpToken: AssetId = LP;
    pub const MaxDecryptionTime: u64 = 300;
    pub static MinimumLiquidity: u64 = 100_000_000;
    pub static PriceScanner: Option<AccountId> = Some(SCANNER);
}

ord_parameter_types! {
    pub const Factory: AccountId = FACTORY;
    pub const Relayer: AccountId = RELAYER;
}

impl pallet_confidential_pair::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type AssetId = AssetId;
    type Fhe = MockFhe;
    type Gateway = MockGateway;
    type Tokens = MockTokens;
    type FactoryOrigin = EnsureSignedBy<Factory, AccountId>;
    type FulfillOrigin = EnsureSignedBy<Relayer, AccountId>;
    type UnixTime = Timestamp;
    type PalletId = PairPalletId;
    type LpToken = LpToken;
    type MaxDecryptionTime = MaxDecryptionTime;
    type MinimumLiquidity = MinimumLiquidity;
    type PriceScanner = PriceScanner;
    type WeightInfo = ();
}

// ------------------------- Coprocessor -------------------------

#[derive(Default)]
struct FheState {
    values: BTreeMap<Handle, (FheType, u128)>,
    next_handle: u64,
    random: BTreeMap<u128, VecDeque<u128>>,
    seed: u64,
    /// (handle, account); `None` is the pallet itself
    acl: BTreeSet<(Handle, Option<AccountId>)>,
}

thread_local! {
    static FHE: RefCell<FheState> = RefCell::new(FheState::default());
}

/// Cleartext stand-in for the coprocessor. Values wrap at their width like FHE integers.
pub struct MockFhe;

impl MockFhe {
    fn reset() {
        FHE.with(|s| *s.borrow_mut() = FheState::default());
    }

    pub fn encrypt(value: u128, ty: FheType) -> Cipher {
        FHE.with(|s| {
            let mut s = s.borrow_mut();
            s.next_handle += 1;
            let mut handle = [0u8; 32];
            handle[..8].copy_from_slice(&s.next_handle.to_le_bytes());
            s.values.insert(handle, (ty, value & ty.max_value()));
            Cipher::new(ty, handle)
        })
    }

    pub fn decrypt(ct: &Cipher) -> u128 {
        FHE.with(|s| {
            let (ty, value) = *s.borrow().values.get(&ct.handle).expect("unknown handle");
            assert_eq!(ty, ct.ty, "handle used at the wrong width");
            value
        })
    }

    /// Queue the next values returned for draws bounded by `bound`.
    pub fn push_random(bound: u128, values: &[u128]) {
        assert!(values.iter().all(|v| *v < bound));
        FHE.with(|s| s.borrow_mut().random.entry(bound).or_default().extend(values));
    }

    pub fn is_allowed(ct: &Cipher, who: AccountId) -> bool {
        FHE.with(|s| s.borrow().acl.contains(&(ct.handle, Some(who))))
    }

    pub fn is_retained(ct: &Cipher) -> bool {
        FHE.with(|s| s.borrow().acl.contains(&(ct.handle, None)))
    }

    /// User-side encryption of 64-bit inputs sharing one proof.
    pub fn inputs<const N: usize>(values: [u128; N]) -> ([ExternalCipher; N], InputProof) {
        let cts = values.map(|v| ExternalCipher(Self::encrypt(v, FheType::U64)));
        let proof: Vec<u8> = cts.iter().flat_map(|ct| ct.0.handle).collect();
        (cts, proof.try_into().expect("proof fits"))
    }

    fn unary(a: &Cipher, ty: FheType, f: impl FnOnce(u128) -> u128) -> Cipher {
        Self::encrypt(f(Self::decrypt(a)), ty)
    }

    fn binary(a: &Cipher, b: &Cipher, f: impl FnOnce(u128, u128) -> u128) -> Cipher {
        assert_eq!(a.ty, b.ty, "operand widths differ");
        Self::encrypt(f(Self::decrypt(a), Self::decrypt(b)), a.ty)
    }

    fn draw(bound: u128) -> u128 {
        FHE.with(|s| {
            let mut s = s.borrow_mut();
            if let Some(value) = s.random.get_mut(&bound).and_then(|queue| queue.pop_front()) {
                return value;
            }
            s.seed = s.seed.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1_442_695_040_888_963_407);
            u128::from(s.seed >> 11) % bound
        })
    }
}

impl FheOps for MockFhe {
    fn trivial_encrypt(value: u128, ty: FheType) -> Cipher {
        Self::encrypt(value, ty)
    }

    fn add(a: &Cipher, b: &Cipher) -> Cipher {
        Self::binary(a, b, u128::wrapping_add)
    }

    fn sub(a: &Cipher, b: &Cipher) -> Cipher {
        Self::binary(a, b, u128::wrapping_sub)
    }

    fn mul(a: &Cipher, b: &Cipher) -> Cipher {
        Self::binary(a, b, u128::wrapping_mul)
    }

    fn add_scalar(a: &Cipher, b: u128) -> Cipher {
        Self::unary(a, a.ty, |x| x.wrapping_add(b))
    }

    fn sub_scalar(a: &Cipher, b: u128) -> Cipher {
        Self::unary(a, a.ty, |x| x.wrapping_sub(b))
    }

    fn mul_scalar(a: &Cipher, b: u128) -> Cipher {
        Self::unary(a, a.ty, |x| x.wrapping_mul(b))
    }

    fn div_scalar(a: &Cipher, divisor: u128) -> Cipher {
        assert_ne!(divisor, 0, "division by zero");
        Self::unary(a, a.ty, |x| x / divisor)
    }

    fn ge(a: &Cipher, b: &Cipher) -> Cipher {
        assert_eq!(a.ty, b.ty, "operand widths differ");
        Self::encrypt((Self::decrypt(a) >= Self::decrypt(b)) as u128, FheType::Bool)
    }

    fn ge_scalar(a: &Cipher, b: u128) -> Cipher {
        Self::unary(a, FheType::Bool, |x| (x >= b) as u128)
    }

    fn min(a: &Cipher, b: &Cipher) -> Cipher {
        Self::binary(a, b, u128::min)
    }

    fn max_scalar(a: &Cipher, b: u128) -> Cipher {
        Self::unary(a, a.ty, |x| x.max(b))
    }

    fn select(cond: &Cipher, if_true: &Cipher, if_false: &Cipher) -> Cipher {
        assert_eq!(cond.ty, FheType::Bool);
        assert_eq!(if_true.ty, if_false.ty, "select branches differ in width");
        let picked = if Self::decrypt(cond) == 1 { if_true } else { if_false };
        Self::unary(picked, picked.ty, |x| x)
    }

    fn cast(a: &Cipher, to: FheType) -> Cipher {
        Self::unary(a, to, |x| x)
    }

    fn random_bounded(upper_bound: u128, ty: FheType) -> Cipher {
        assert!(upper_bound.is_power_of_two());
        Self::encrypt(Self::draw(upper_bound), ty)
    }

    fn random_bool() -> Cipher {
        Self::encrypt(Self::draw(2), FheType::Bool)
    }

    fn verify_input(
        input: &ExternalCipher,
        proof: &InputProof,
        expected: FheType,
    ) -> Result<Cipher, DispatchError> {
        let covered = proof.chunks(32).any(|chunk| chunk == input.0.handle.as_slice());
        if !covered || input.0.ty != expected {
            return Err(DispatchError::Other("invalid input proof"));
        }
        Ok(input.0)
    }
}

impl FheAcl<AccountId> for MockFhe {
    fn allow_this(ct: &Cipher) {
        FHE.with(|s| s.borrow_mut().acl.insert((ct.handle, None)));
    }

    fn allow(ct: &Cipher, who: &AccountId) {
        FHE.with(|s| s.borrow_mut().acl.insert((ct.handle, Some(*who))));
    }
}

// ------------------------- Gateway -------------------------

#[derive(Default)]
struct GatewayState {
    last_id: RequestId,
    requests: BTreeMap<RequestId, Vec<Cipher>>,
}

thread_local! {
    static GATEWAY: RefCell<GatewayState> = RefCell::new(GatewayState::default());
}

/// Records requests and signs answers with blake2 over `(request, cleartexts)`.
pub struct MockGateway;

impl MockGateway {
    fn reset() {
        GATEWAY.with(|s| *s.borrow_mut() = GatewayState::default());
    }

    pub fn sign(request: RequestId, cleartexts: &[u128]) -> DecryptionProof {
        blake2_256(&(request, cleartexts).encode()).to_vec().try_into().expect("32 bytes fit")
    }

    pub fn last_request() -> RequestId {
        GATEWAY.with(|s| s.borrow().last_id)
    }

    pub fn ciphertexts(request: RequestId) -> Vec<Cipher> {
        GATEWAY.with(|s| s.borrow().requests.get(&request).cloned().expect("unknown request"))
    }

    /// Honest answer to `request`.
    pub fn response(request: RequestId) -> (Cleartexts, DecryptionProof) {
        let clear: Vec<u128> = Self::ciphertexts(request).iter().map(MockFhe::decrypt).collect();
        let proof = Self::sign(request, &clear);
        (clear.try_into().expect("request within bounds"), proof)
    }
}

impl DecryptionGateway for MockGateway {
    fn request_decryption(cts: &[Cipher]) -> Result<RequestId, DispatchError> {
        GATEWAY.with(|s| {
            let mut s = s.borrow_mut();
            s.last_id += 1;
            let id = s.last_id;
            s.requests.insert(id, cts.to_vec());
            Ok(id)
        })
    }

    fn verify_decryption(request: RequestId, cleartexts: &[u128], proof: &[u8]) -> bool {
        Self::sign(request, cleartexts).as_slice() == proof
    }
}

// ------------------------- Tokens -------------------------

#[derive(Default)]
struct TokenState {
    balances: BTreeMap<(AssetId, AccountId), u128>,
    /// (holder, operator)
    operators: BTreeSet<(AccountId, AccountId)>,
}

thread_local! {
    static TOKENS: RefCell<TokenState> = RefCell::new(TokenState::default());
}

/// Cleartext ledger behind encrypted amounts. Short balances move zero.
pub struct MockTokens;

impl MockTokens {
    fn reset() {
        TOKENS.with(|s| *s.borrow_mut() = TokenState::default());
    }

    pub fn balance(asset: AssetId, who: AccountId) -> u128 {
        TOKENS.with(|s| s.borrow().balances.get(&(asset, who)).copied().unwrap_or_default())
    }

    pub fn set_balance(asset: AssetId, who: AccountId, amount: u128) {
        TOKENS.with(|s| s.borrow_mut().balances.insert((asset, who), amount));
    }

    pub fn approve(holder: AccountId, operator: AccountId) {
        TOKENS.with(|s| s.borrow_mut().operators.insert((holder, operator)));
    }

    fn do_transfer(asset: AssetId, from: AccountId, to: AccountId, amount: u128) -> Cipher {
        let moved = if Self::balance(asset, from) >= amount { amount } else { 0 };
        Self::set_balance(asset, from, Self::balance(asset, from) - moved);
        Self::set_balance(asset, to, Self::balance(asset, to) + moved);
        MockFhe::encrypt(moved, FheType::U64)
    }
}

impl ConfidentialTokens<AccountId, AssetId> for MockTokens {
    fn transfer_from(
        asset: AssetId,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: &Cipher,
    ) -> Result<Cipher, DispatchError> {
        let approved = operator == from || TOKENS.with(|s| s.borrow().operators.contains(&(*from, *operator)));
        if !approved {
            return Err(DispatchError::Other("operator not approved"));
        }
        Ok(Self::do_transfer(asset, *from, *to, MockFhe::decrypt(amount)))
    }

    fn transfer(
        asset: AssetId,
        from: &AccountId,
        to: &AccountId,
        amount: &Cipher,
    ) -> Result<Cipher, DispatchError> {
        Ok(Self::do_transfer(asset, *from, *to, MockFhe::decrypt(amount)))
    }

    fn mint(asset: AssetId, to: &AccountId, amount: &Cipher) -> Result<Cipher, DispatchError> {
        let amount = MockFhe::decrypt(amount);
        Self::set_balance(asset, *to, Self::balance(asset, *to) + amount);
        Ok(MockFhe::encrypt(amount, FheType::U64))
    }

    fn burn(asset: AssetId, from: &AccountId, amount: &Cipher) -> Result<Cipher, DispatchError> {
        let amount = MockFhe::decrypt(amount);
        let burnt = if Self::balance(asset, *from) >= amount { amount } else { 0 };
        Self::set_balance(asset, *from, Self::balance(asset, *from) - burnt);
        Ok(MockFhe::encrypt(burnt, FheType::U64))
    }
}

// ------------------------- Externalities & helpers -------------------------

pub fn new_test_ext() -> sp_io::TestExternalities {
    MockFhe::reset();
    MockGateway::reset();
    MockTokens::reset();
    MinimumLiquidity::set(100_000_000);
    PriceScanner::set(Some(SCANNER));

    let storage = frame_system::GenesisConfig::<Test>::default()
        .build_storage()
        .expect("valid default genesis storage");
    let mut ext = sp_io::TestExternalities::new(storage);
    ext.execute_with(|| {
        System::set_block_number(1);
        Timestamp::set_timestamp(GENESIS * 1_000);
    });
    ext
}

pub fn pair_account() -> AccountId {
    Pair::account_id()
}

pub fn now() -> u64 {
    <Timestamp as UnixTime>::now().as_secs()
}

pub fn advance(secs: u64) {
    Timestamp::set_timestamp((now() + secs) * 1_000);
}

pub fn deadline() -> u64 {
    now() + 60
}

/// Relay the honest answer to `request`.
pub fn fulfill(request: RequestId) -> DispatchResult {
    let (cleartexts, proof) = MockGateway::response(request);
    Pair::fulfill_decryption(RuntimeOrigin::signed(RELAYER), request, cleartexts, proof)
}

/// Obfuscation draws that give both axes the same factor and multiplier, so the
/// disclosed price is exact.
pub fn neutral_obfuscation() {
    MockFhe::push_random(NOISE_SPAN, &[0, 0]);
    MockFhe::push_random(2, &[1, 0]);
    MockFhe::push_random(MULTIPLIER_DRAW_SPAN, &[0, 0]);
}

/// Initialised pair with the pair account approved as operator for every user.
pub fn setup_pair() {
    frame_support::assert_ok!(Pair::initialize(RuntimeOrigin::signed(FACTORY), TOKEN0, TOKEN1));
    for who in [ALICE, BOB, CHARLIE] {
        MockTokens::approve(who, pair_account());
    }
}

/// `who` opens the pair with `(amount0, amount1)` and the request is answered.
pub fn seed_liquidity(who: AccountId, amount0: u128, amount1: u128) {
    MockTokens::set_balance(TOKEN0, who, MockTokens::balance(TOKEN0, who) + amount0);
    MockTokens::set_balance(TOKEN1, who, MockTokens::balance(TOKEN1, who) + amount1);
    let ([a0, a1], proof) = MockFhe::inputs([amount0, amount1]);
    frame_support::assert_ok!(Pair::add_liquidity(
        RuntimeOrigin::signed(who),
        a0,
        a1,
        proof,
        deadline()
    ));
    neutral_obfuscation();
    frame_support::assert_ok!(fulfill(MockGateway::last_request()));
}
